use poise::serenity_prelude::{self as serenity, Colour, CreateEmbed};

use crate::Context;
use crate::discord_helper::MessageState;

static EMBED_COLOR: &[(&MessageState, Colour)] = &[
    (&MessageState::SUCCESS, Colour::new(0x2ECC71)),
    (&MessageState::WARN, Colour::new(0xFFA53F)),
    (&MessageState::ERROR, Colour::new(0xcc3300)),
    (&MessageState::INFO, Colour::new(0x1434A4)),
];

pub fn get_embed_color(message_state: &MessageState) -> Colour {
    EMBED_COLOR
        .iter()
        .find_map(|(k, v)| (*k == message_state).then_some(*v))
        .expect("State must have color")
}

pub async fn single_text_response(ctx: &Context<'_>, text: &str, message_state: MessageState, ephemeral: bool) {
    let _ = ctx.send(
        poise::CreateReply::default().embed(
            single_text_response_embed(text, message_state)).ephemeral(ephemeral)
    ).await;
}

pub fn single_text_response_embed(text: &str, message_state: MessageState) -> CreateEmbed {
    serenity::CreateEmbed::default().description(text).color(get_embed_color(&message_state))
}

pub fn welcome_embed(member_name: &str, display_id: &str, avatar_url: String) -> CreateEmbed {
    CreateEmbed::default()
        .title(format!("Welcome to the Server, {}!", member_name))
        .description(format!("We're glad to have you here.\nYour unique ID is **#{}**.", display_id))
        .thumbnail(avatar_url)
        .color(get_embed_color(&MessageState::INFO))
}

pub fn roster_embed(description: String) -> CreateEmbed {
    CreateEmbed::default()
        .title("Assigned Member IDs")
        .description(description)
        .color(get_embed_color(&MessageState::SUCCESS))
}
