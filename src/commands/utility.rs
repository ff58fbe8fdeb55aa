use tracing::error;

use crate::{Context, Error};

#[poise::command(slash_command)]
pub async fn info(ctx: Context<'_>) -> Result<(), Error> {
    let response = format!(
        "
        • `/uwu_lock @user` - Curse a user with uwu speech (admin)\n\
        • `/uwu_unlock @user` - Lift the curse (admin)\n\
        • `/uwu_list` - Show who is cursed here (admin)\n\
        • `/uwu_preview text` - See what the curse would do to some text\n\
        • `/info` - Show this message\n\
        Currently uwuifying with: `{}`\n\
        ",
        ctx.data().uwuifier.name()
    );
    ctx.say(response).await?;
    Ok(())
}

#[poise::command(slash_command)]
pub async fn uwu_preview(
    ctx: Context<'_>,
    #[description = "Text to uwuify"] text: String,
) -> Result<(), Error> {
    if text.trim().is_empty() {
        ctx.send(poise::CreateReply::default().content("Nothing to uwuify.").ephemeral(true))
            .await?;
        return Ok(());
    }

    // Gemini can take a while
    ctx.defer_ephemeral().await?;

    let response = match ctx.data().uwuifier.uwuify(&text).await {
        Ok(uwu_text) => uwu_text,
        Err(e) => {
            error!("Preview uwuify failed: {}", e);
            "Couldn't uwuify that right now.".to_string()
        }
    };
    ctx.send(poise::CreateReply::default().content(response).ephemeral(true))
        .await?;
    Ok(())
}
