use poise::serenity_prelude as serenity;
use tracing::{error, info};

mod commands;
mod config;
mod error;
mod health;
mod interceptor;
mod registry;
mod uwu;

use config::Config;
use registry::CurseRegistry;
use uwu::Uwuifier;

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

pub struct Data {
    curses: CurseRegistry,
    uwuifier: Box<dyn Uwuifier>,
    admin_role: Option<String>,
}

async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("Logged in as {}", data_about_bot.user.name);
        }
        serenity::FullEvent::Message { new_message } => {
            interceptor::handle_message(ctx, new_message, data).await;
        }
        _ => {}
    }
    Ok(())
}

async fn on_error(err: poise::FrameworkError<'_, Data, Error>) {
    if let poise::FrameworkError::Command { error, ctx, .. } = &err {
        error!("Command /{} failed: {}", ctx.command().name, error);
    }
    if let Err(e) = poise::builtins::on_error(err).await {
        error!("Error while handling error: {}", e);
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize the logger
    tracing_subscriber::fmt::init();

    let config = Config::from_env().inspect_err(|e| error!("Refusing to start: {}", e))?;

    let uwuifier = uwu::from_mode(&config.mode)?;
    info!("Uwuifying with the {} strategy", uwuifier.name());

    health::spawn(config.port).await?;

    let data = Data {
        curses: CurseRegistry::new(),
        uwuifier,
        admin_role: config.admin_role.clone(),
    };

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::uwu_lock(),
                commands::uwu_unlock(),
                commands::uwu_list(),
                commands::uwu_preview(),
                commands::info(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |err| Box::pin(on_error(err)),
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Commands registered");
                Ok(data)
            })
        })
        .build();

    let intents =
        serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let mut client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot...");

    client.start().await?;
    Ok(())
}
