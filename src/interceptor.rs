use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use serenity::constants::MESSAGE_CODE_LIMIT;
use serenity::{ChannelId, CreateAllowedMentions, CreateMessage, GuildId, MessageId, UserId};
use tracing::{debug, error, info, warn};

use crate::error::DeliveryError;
use crate::registry::CurseRegistry;
use crate::uwu::Uwuifier;
use crate::Data;

/// The parts of a gateway message the interceptor looks at.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub author_id: UserId,
    pub author_is_bot: bool,
    pub author_name: String,
    pub content: String,
}

impl IncomingMessage {
    pub fn from_discord(msg: &serenity::Message) -> Self {
        let author_name = msg
            .member
            .as_ref()
            .and_then(|member| member.nick.clone())
            .unwrap_or_else(|| msg.author.display_name().to_string());

        IncomingMessage {
            guild_id: msg.guild_id,
            channel_id: msg.channel_id,
            message_id: msg.id,
            author_id: msg.author.id,
            author_is_bot: msg.author.bot,
            author_name,
            content: msg.content.clone(),
        }
    }
}

/// Where deletions and reposts go.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn delete(&self, channel: ChannelId, message: MessageId) -> Result<(), DeliveryError>;

    async fn send(&self, channel: ChannelId, content: &str) -> Result<(), DeliveryError>;
}

pub struct DiscordSink<'a> {
    http: &'a serenity::Http,
}

impl<'a> DiscordSink<'a> {
    pub fn new(http: &'a serenity::Http) -> Self {
        Self { http }
    }
}

#[async_trait]
impl MessageSink for DiscordSink<'_> {
    async fn delete(&self, channel: ChannelId, message: MessageId) -> Result<(), DeliveryError> {
        channel.delete_message(self.http, message).await?;
        Ok(())
    }

    async fn send(&self, channel: ChannelId, content: &str) -> Result<(), DeliveryError> {
        // Nobody gets pinged through the bot on a cursed user's behalf.
        let message = CreateMessage::new()
            .content(content)
            .allowed_mentions(CreateAllowedMentions::new());
        channel.send_message(self.http, message).await?;
        Ok(())
    }
}

/// Which way a message went through [`intercept`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Bot author or no guild.
    Ignored,
    NotCursed,
    /// Cursed, but nothing to rewrite (e.g. attachment only).
    Blank,
    TransformFailed,
    /// The repost would exceed Discord's message limit, so the original stays.
    TooLong,
    Rewritten { deleted: bool, reposted: bool },
}

pub fn repost_text(author_name: &str, uwu_text: &str) -> String {
    format!("**{} says:** {}", author_name, uwu_text)
}

pub async fn intercept(
    curses: &CurseRegistry,
    uwuifier: &dyn Uwuifier,
    sink: &dyn MessageSink,
    msg: &IncomingMessage,
) -> Outcome {
    let guild_id = match msg.guild_id {
        Some(guild_id) if !msg.author_is_bot => guild_id,
        _ => return Outcome::Ignored,
    };

    if !curses.is_cursed(guild_id, msg.author_id).await {
        return Outcome::NotCursed;
    }

    if msg.content.trim().is_empty() {
        debug!("Cursed user {} sent a message without text, leaving it", msg.author_id);
        return Outcome::Blank;
    }

    let uwu_text = match uwuifier.uwuify(&msg.content).await {
        Ok(text) => text,
        Err(e) => {
            error!(
                "Failed to uwuify message {} with {}: {}",
                msg.message_id,
                uwuifier.name(),
                e
            );
            return Outcome::TransformFailed;
        }
    };

    let repost = repost_text(&msg.author_name, &uwu_text);
    let repost_len = repost.chars().count();
    if repost_len > MESSAGE_CODE_LIMIT {
        warn!(
            "Repost of message {} would be {} chars (limit {}), leaving the original",
            msg.message_id, repost_len, MESSAGE_CODE_LIMIT
        );
        return Outcome::TooLong;
    }

    let deleted = match sink.delete(msg.channel_id, msg.message_id).await {
        Ok(()) => true,
        Err(e) => {
            warn!("Could not delete message {} from cursed user: {}", msg.message_id, e);
            false
        }
    };

    let reposted = match sink.send(msg.channel_id, &repost).await {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to repost uwu message in channel {}: {}", msg.channel_id, e);
            false
        }
    };

    info!(
        guild = %guild_id,
        user = %msg.author_id,
        deleted,
        reposted,
        "Rewrote message from cursed user"
    );

    Outcome::Rewritten { deleted, reposted }
}

pub async fn handle_message(ctx: &serenity::Context, msg: &serenity::Message, data: &Data) {
    let incoming = IncomingMessage::from_discord(msg);
    let sink = DiscordSink::new(&ctx.http);
    intercept(&data.curses, data.uwuifier.as_ref(), &sink, &incoming).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use crate::uwu::RuleUwuifier;
    use std::sync::Mutex;

    const GUILD: GuildId = GuildId::new(1);
    const OTHER_GUILD: GuildId = GuildId::new(2);
    const CHANNEL: ChannelId = ChannelId::new(100);
    const MESSAGE: MessageId = MessageId::new(1000);
    const CURSED: UserId = UserId::new(10);
    const FREE: UserId = UserId::new(11);

    #[derive(Debug, PartialEq)]
    enum Call {
        Delete(ChannelId, MessageId),
        Send(ChannelId, String),
    }

    #[derive(Default)]
    struct RecordingSink {
        calls: Mutex<Vec<Call>>,
        refuse_delete: bool,
    }

    impl RecordingSink {
        fn calls(&self) -> Vec<Call> {
            std::mem::take(&mut *self.calls.lock().unwrap())
        }
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        async fn delete(&self, channel: ChannelId, message: MessageId) -> Result<(), DeliveryError> {
            self.calls.lock().unwrap().push(Call::Delete(channel, message));
            if self.refuse_delete {
                return Err(serenity::Error::Other("Missing Permissions").into());
            }
            Ok(())
        }

        async fn send(&self, channel: ChannelId, content: &str) -> Result<(), DeliveryError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Send(channel, content.to_string()));
            if content.chars().count() > MESSAGE_CODE_LIMIT {
                return Err(serenity::Error::Other("Message too large").into());
            }
            Ok(())
        }
    }

    struct BrokenUwuifier;

    #[async_trait]
    impl Uwuifier for BrokenUwuifier {
        fn name(&self) -> &'static str {
            "broken"
        }

        async fn uwuify(&self, _text: &str) -> Result<String, TransformError> {
            Err(TransformError::EmptyResponse)
        }
    }

    struct FixedUwuifier(String);

    #[async_trait]
    impl Uwuifier for FixedUwuifier {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn uwuify(&self, _text: &str) -> Result<String, TransformError> {
            Ok(self.0.clone())
        }
    }

    fn message(author_id: UserId, content: &str) -> IncomingMessage {
        IncomingMessage {
            guild_id: Some(GUILD),
            channel_id: CHANNEL,
            message_id: MESSAGE,
            author_id,
            author_is_bot: false,
            author_name: "Kitty".to_string(),
            content: content.to_string(),
        }
    }

    async fn cursed_registry() -> CurseRegistry {
        let curses = CurseRegistry::new();
        curses.lock(GUILD, CURSED).await;
        curses
    }

    #[tokio::test]
    async fn cursed_text_is_deleted_and_reposted_once() {
        let curses = cursed_registry().await;
        let sink = RecordingSink::default();

        let outcome = intercept(&curses, &RuleUwuifier, &sink, &message(CURSED, "hello there")).await;

        assert_eq!(outcome, Outcome::Rewritten { deleted: true, reposted: true });
        let expected = repost_text("Kitty", &crate::uwu::rules::uwuify("hello there"));
        assert_eq!(
            sink.calls(),
            vec![Call::Delete(CHANNEL, MESSAGE), Call::Send(CHANNEL, expected)]
        );
    }

    #[test]
    fn repost_names_the_author() {
        assert_eq!(repost_text("Kitty", "h-hewwo uwu"), "**Kitty says:** h-hewwo uwu");
    }

    #[tokio::test]
    async fn uncursed_users_pass_through() {
        let curses = cursed_registry().await;
        let sink = RecordingSink::default();

        let outcome = intercept(&curses, &RuleUwuifier, &sink, &message(FREE, "hello")).await;

        assert_eq!(outcome, Outcome::NotCursed);
        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn curse_does_not_leak_into_other_guilds() {
        let curses = cursed_registry().await;
        let sink = RecordingSink::default();
        let mut msg = message(CURSED, "hello");
        msg.guild_id = Some(OTHER_GUILD);

        assert_eq!(intercept(&curses, &RuleUwuifier, &sink, &msg).await, Outcome::NotCursed);
        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn whitespace_only_messages_are_left_alone() {
        let curses = cursed_registry().await;
        let sink = RecordingSink::default();

        for content in ["", "   ", "\n\t "] {
            let outcome = intercept(&curses, &RuleUwuifier, &sink, &message(CURSED, content)).await;
            assert_eq!(outcome, Outcome::Blank);
        }
        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn bots_and_direct_messages_are_ignored() {
        let curses = cursed_registry().await;
        let sink = RecordingSink::default();

        let mut from_bot = message(CURSED, "beep");
        from_bot.author_is_bot = true;
        assert_eq!(intercept(&curses, &RuleUwuifier, &sink, &from_bot).await, Outcome::Ignored);

        let mut direct = message(CURSED, "hello");
        direct.guild_id = None;
        assert_eq!(intercept(&curses, &RuleUwuifier, &sink, &direct).await, Outcome::Ignored);

        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_transform_keeps_the_original() {
        let curses = cursed_registry().await;
        let sink = RecordingSink::default();

        let outcome = intercept(&curses, &BrokenUwuifier, &sink, &message(CURSED, "hello")).await;

        assert_eq!(outcome, Outcome::TransformFailed);
        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn oversized_repost_keeps_the_original() {
        let curses = cursed_registry().await;
        let sink = RecordingSink::default();
        let content = "no ".repeat(666);
        assert!(content.chars().count() <= MESSAGE_CODE_LIMIT);

        let outcome = intercept(&curses, &RuleUwuifier, &sink, &message(CURSED, &content)).await;

        assert_eq!(outcome, Outcome::TooLong);
        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn repost_right_at_the_limit_goes_through() {
        let curses = cursed_registry().await;
        let sink = RecordingSink::default();
        let framing = repost_text("Kitty", "").chars().count();
        let uwuifier = FixedUwuifier("w".repeat(MESSAGE_CODE_LIMIT - framing));

        let outcome = intercept(&curses, &uwuifier, &sink, &message(CURSED, "hi")).await;

        assert_eq!(outcome, Outcome::Rewritten { deleted: true, reposted: true });
        match sink.calls().as_slice() {
            [Call::Delete(..), Call::Send(_, text)] => {
                assert_eq!(text.chars().count(), MESSAGE_CODE_LIMIT);
            }
            other => panic!("unexpected calls: {other:?}"),
        }
    }

    #[tokio::test]
    async fn long_generated_text_keeps_the_original() {
        let curses = cursed_registry().await;
        let sink = RecordingSink::default();
        let uwuifier = FixedUwuifier("owo ".repeat(600));

        let outcome = intercept(&curses, &uwuifier, &sink, &message(CURSED, "hi")).await;

        assert_eq!(outcome, Outcome::TooLong);
        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn failed_delete_still_reposts() {
        let curses = cursed_registry().await;
        let sink = RecordingSink {
            refuse_delete: true,
            ..Default::default()
        };

        let outcome = intercept(&curses, &RuleUwuifier, &sink, &message(CURSED, "hello")).await;

        assert_eq!(outcome, Outcome::Rewritten { deleted: false, reposted: true });
        assert_eq!(sink.calls().len(), 2);
    }

    #[tokio::test]
    async fn unlocked_user_is_no_longer_intercepted() {
        let curses = cursed_registry().await;
        curses.unlock(GUILD, CURSED).await;
        let sink = RecordingSink::default();

        let outcome = intercept(&curses, &RuleUwuifier, &sink, &message(CURSED, "hello")).await;

        assert_eq!(outcome, Outcome::NotCursed);
    }
}
