use std::collections::HashMap;

use chrono::{DateTime, Utc};
use poise::serenity_prelude::{GuildId, UserId};
use tokio::sync::RwLock;

/// Who is cursed in which guild. Lives only as long as the process.
#[derive(Debug, Default)]
pub struct CurseRegistry {
    guilds: RwLock<HashMap<GuildId, HashMap<UserId, DateTime<Utc>>>>,
}

impl CurseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Curses `user` in `guild`. Locking twice keeps the first timestamp.
    pub async fn lock(&self, guild: GuildId, user: UserId) {
        let mut guilds = self.guilds.write().await;
        guilds
            .entry(guild)
            .or_default()
            .entry(user)
            .or_insert_with(Utc::now);
    }

    /// Lifts the curse. Returns whether the user was cursed.
    pub async fn unlock(&self, guild: GuildId, user: UserId) -> bool {
        let mut guilds = self.guilds.write().await;
        guilds
            .get_mut(&guild)
            .map(|users| users.remove(&user).is_some())
            .unwrap_or(false)
    }

    pub async fn is_cursed(&self, guild: GuildId, user: UserId) -> bool {
        let guilds = self.guilds.read().await;
        guilds
            .get(&guild)
            .is_some_and(|users| users.contains_key(&user))
    }

    /// Cursed users of a guild, oldest curse first.
    pub async fn cursed_in(&self, guild: GuildId) -> Vec<(UserId, DateTime<Utc>)> {
        let guilds = self.guilds.read().await;
        let mut users: Vec<_> = guilds
            .get(&guild)
            .map(|users| users.iter().map(|(id, at)| (*id, *at)).collect())
            .unwrap_or_default();
        users.sort_by_key(|(id, at)| (*at, *id));
        users
    }
}
