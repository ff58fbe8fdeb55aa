pub mod curse;
pub mod utility;

use crate::{Context, Error};

/// Check if user is an admin (bot owner, ADMINISTRATOR permission, or the configured admin role)
pub async fn is_admin(ctx: Context<'_>) -> Result<bool, Error> {
    let user_id = ctx.author().id;

    // Check if user is bot application owner
    if let Ok(app_info) = ctx.http().get_current_application_info().await {
        if let Some(owner) = &app_info.owner {
            if owner.id == user_id {
                return Ok(true);
            }
        }
    }

    let Some(guild_id) = ctx.guild_id() else {
        return Ok(false);
    };

    let Some(member) = ctx.author_member().await else {
        return Ok(false);
    };

    // Interactions carry the member's resolved permissions
    if member.permissions.is_some_and(|perms| perms.administrator()) {
        return Ok(true);
    }

    if let Some(admin_role_name) = &ctx.data().admin_role {
        if let Ok(guild) = guild_id.to_partial_guild(ctx.http()).await {
            for role_id in &member.roles {
                if let Some(role) = guild.roles.get(role_id) {
                    if &role.name == admin_role_name {
                        return Ok(true);
                    }
                }
            }
        }
    }

    Ok(false)
}

/// Replies with an ephemeral refusal when the caller is not an admin.
pub async fn require_admin(ctx: Context<'_>) -> Result<bool, Error> {
    if is_admin(ctx).await? {
        return Ok(true);
    }

    let mut response = String::from(
        "You don't have permission to use this command.\n\
         **Required:** Bot owner or Administrator permission",
    );
    if let Some(role) = &ctx.data().admin_role {
        response.push_str(&format!(", or the '{}' role", role));
    }
    ctx.send(poise::CreateReply::default().content(response).ephemeral(true))
        .await?;
    Ok(false)
}

pub use curse::*;
pub use utility::*;
