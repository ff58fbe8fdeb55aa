use std::env;

use crate::error::ConfigError;

pub const DEFAULT_PORT: u16 = 10000;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Which transformer rewrites cursed messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UwuMode {
    Gemini { api_key: String, model: String },
    Rules,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub mode: UwuMode,
    pub port: u16,
    pub admin_role: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let discord_token = get("DISCORD_TOKEN")
            .or_else(|| get("TOKEN"))
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;

        let mode = match get("UWU_MODE").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("gemini") => UwuMode::Gemini {
                api_key: get("GEMINI_API_KEY").ok_or(ConfigError::Missing("GEMINI_API_KEY"))?,
                model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            },
            Some("rules") => UwuMode::Rules,
            Some(other) => return Err(ConfigError::UnknownMode(other.to_string())),
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            discord_token,
            mode,
            port,
            admin_role: get("ADMIN_ROLE_NAME"),
        })
    }
}
