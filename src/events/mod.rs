use poise::FrameworkContext;
use poise::serenity_prelude as serenity;

use crate::{Data, Error};

mod member_join;

pub fn handle_events<'a>(
    ctx: &'a serenity::Context,
    event: &'a serenity::FullEvent,
    _framework: &FrameworkContext<'a, Data, Error>,
    data: &'a Data
) -> poise::BoxFuture<'a, Result<(), Error>> {
    Box::pin(async move {
        match event {
            serenity::FullEvent::Ready { data_about_bot } => {
                tracing::info!(user = %data_about_bot.user.name, "Logged in. Bot is ready to assign IDs.");
            }
            serenity::FullEvent::GuildMemberAddition { new_member } => {
                member_join::handle_member_join(ctx, new_member, data).await?;
            }
            _ => {}
        }
        Ok(())
    })
}
