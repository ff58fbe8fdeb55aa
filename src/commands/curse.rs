use poise::serenity_prelude as serenity;
use serenity::Mentionable;
use tracing::info;

use crate::{Context, Error};
use super::require_admin;

#[poise::command(slash_command, guild_only)]
pub async fn uwu_lock(
    ctx: Context<'_>,
    #[description = "User to curse with uwu speech"] user: serenity::User,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };
    if !require_admin(ctx).await? {
        return Ok(());
    }

    ctx.data().curses.lock(guild_id, user.id).await;
    info!("{} cursed {} in guild {}", ctx.author().name, user.name, guild_id);

    ctx.say(format!("🔒 **{} has been UwU cursed.** 😈", user.mention())).await?;
    Ok(())
}

#[poise::command(slash_command, guild_only)]
pub async fn uwu_unlock(
    ctx: Context<'_>,
    #[description = "User to free from the curse"] user: serenity::User,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };
    if !require_admin(ctx).await? {
        return Ok(());
    }

    let was_cursed = ctx.data().curses.unlock(guild_id, user.id).await;
    info!(
        "{} freed {} in guild {} (was cursed: {})",
        ctx.author().name, user.name, guild_id, was_cursed
    );

    ctx.say(format!("🔓 **{} is free.** 🗿", user.mention())).await?;
    Ok(())
}

#[poise::command(slash_command, guild_only)]
pub async fn uwu_list(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return Ok(());
    };
    if !require_admin(ctx).await? {
        return Ok(());
    }

    let cursed = ctx.data().curses.cursed_in(guild_id).await;
    let response = if cursed.is_empty() {
        "Nobody is cursed here. 🕊️".to_string()
    } else {
        let mut response = String::from("**UwU cursed users:**\n");
        for (user_id, since) in cursed {
            response.push_str(&format!(
                "• {} since <t:{}:R>\n",
                user_id.mention(),
                since.timestamp()
            ));
        }
        response
    };

    ctx.send(
        poise::CreateReply::default()
            .content(response)
            .allowed_mentions(serenity::CreateAllowedMentions::new())
            .ephemeral(true),
    )
    .await?;
    Ok(())
}
