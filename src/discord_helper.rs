use crate::{Context, Data, Error, embeds::single_text_response};

#[derive(PartialEq)]
pub enum MessageState {
    SUCCESS,
    WARN,
    ERROR,
    INFO,
}

pub async fn handle_error(error: poise::FrameworkError<'_, Data, Error>) -> () {
    let print_fatal_error = match &error {
        poise::FrameworkError::CommandCheckFailed { .. } => false,
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            single_text_response(ctx, "You do not have the required permissions to run this command.", MessageState::ERROR, true).await;
            false
        },
        poise::FrameworkError::MissingBotPermissions { .. } => {
            match error.ctx() {
                Some(ctx) => {
                    single_text_response(&ctx, "Bot has missing permissions", MessageState::ERROR, true).await;
                },
            None => (),
            };
            false
        },
        poise::FrameworkError::Setup { error, .. } => {
            tracing::error!(error);
            true
        },
        poise::FrameworkError::EventHandler { error, .. } => {
            tracing::error!(error);
            true
        },
        poise::FrameworkError::CommandPanic { payload, ctx,  .. } => {
            tracing::error!(payload);
            single_text_response(ctx, "An unexpected error occurred. Please check the bot's console.", MessageState::ERROR, true).await;
            false
        },
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(error);
            single_text_response(ctx, "An unexpected error occurred. Please check the bot's console.", MessageState::ERROR, true).await;
            false
        },
        _ => true
    };

    if print_fatal_error {
        match error.ctx() {
            Some(ctx) => {
                single_text_response(&ctx, "An unexpected error occurred. Please check the bot's console.", MessageState::ERROR, true).await;
            },
            None => (),
        }
    };
}

pub async fn global_check(ctx: Context<'_>) -> Result<bool, Error> {
    tracing::info!(user = ctx.author().display_name(), command = ctx.command().qualified_name, "User called a command");
    Ok(true)
}
