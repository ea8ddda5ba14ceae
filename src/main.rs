use poise::serenity_prelude as serenity;
use tokio::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt};

mod allocator;
mod commands;
mod config;
mod discord_helper;
mod embeds;
mod events;
mod roster;
mod store;

/// Shared bot state, injected into every command and event handler.
struct Data {
    config: config::Config,
    /// All ID allocation serializes behind this lock so that two in-flight
    /// assignments can never read the same free-ID set.
    ids: Mutex<store::IdentityStore>,
}
type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

fn init_logging() {
    // RUST_LOG=info,mycrate=debug,hyper=warn
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false) // hide module path unless you want it
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    tracing::info!("logging initialized (set RUST_LOG to adjust verbosity)");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_logging();
    tracing::info!("starting up...");

    let config_path =
        std::env::var("IDBOT_CONFIG_FILE").unwrap_or_else(|_| "config.json".to_string());
    let config = match config::Config::load(&config_path) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(path = %config_path, %error, "configuration is missing or invalid, refusing to start");
            std::process::exit(1);
        }
    };

    let data_path = std::env::var("IDBOT_DATA_FILE").unwrap_or_else(|_| "data.json".to_string());
    let ids = match store::IdentityStore::load(&data_path) {
        Ok(ids) => ids,
        Err(error) => {
            tracing::error!(path = %data_path, %error, "could not read the ID data file");
            std::process::exit(1);
        }
    };
    tracing::info!(records = ids.len(), "identity store loaded");

    let token = config.bot_token.clone();
    let intents = serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::GUILD_MEMBERS;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::slash_commands_bundle(),
            event_handler: |ctx, event, framework, data| {
                events::handle_events(ctx, event, &framework, data)
            },
            on_error: |error| {
                Box::pin(discord_helper::handle_error(error))
            },
            command_check: Some(|ctx| Box::pin(discord_helper::global_check(ctx))),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx.clone(), &framework.options().commands).await?;
                tracing::info!("The bot is ready to use!");
                Ok(Data { config, ids: Mutex::new(ids) })
            })
        })
        .build();

    let client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await;
    client.unwrap().start().await.unwrap();
}
