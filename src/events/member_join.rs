use poise::serenity_prelude::{self as serenity};

use crate::{Data, Error, allocator, embeds};

pub async fn handle_member_join(
    ctx: &serenity::Context,
    new_member: &serenity::Member,
    data: &Data,
) -> Result<(), Error> {
    if new_member.user.bot {
        return Ok(());
    }
    tracing::info!(user = %new_member.user.name, "member joined the server");

    let mut ids = data.ids.lock().await;
    let outcome = allocator::assign_id_and_role(
        ctx,
        new_member.guild_id,
        new_member,
        &mut ids,
        &data.config.role_prefix,
    )
    .await?;
    drop(ids);

    let Some(display_id) = outcome.display_id() else {
        return Ok(());
    };
    let Some(channel_id) = data.config.welcome_channel_id else {
        return Ok(());
    };

    // The welcome message is best effort; the member already has their ID.
    let embed = embeds::welcome_embed(&new_member.user.name, display_id, new_member.user.face());
    let message = serenity::CreateMessage::new().embed(embed);
    if let Err(error) = serenity::ChannelId::new(channel_id).send_message(&ctx.http, message).await {
        tracing::warn!(channel_id, %error, "could not send welcome message");
    }
    Ok(())
}
