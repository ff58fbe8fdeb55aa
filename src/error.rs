use thiserror::Error;

/// Startup configuration problems. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("unknown UWU_MODE {0:?} (expected \"gemini\" or \"rules\")")]
    UnknownMode(String),

    #[error("invalid PORT {0:?}")]
    InvalidPort(String),
}

/// Failures producing the uwu-ified text. The original message is left alone.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("gemini request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("gemini returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("gemini response had no usable text")]
    EmptyResponse,
}

/// Failures deleting or posting a message on Discord.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("discord request failed: {0}")]
    Discord(#[from] poise::serenity_prelude::Error),
}
