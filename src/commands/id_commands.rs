use std::collections::HashMap;

use poise::serenity_prelude::{self as serenity, Mentionable};

use crate::{Context, Error, allocator, roster};
use crate::discord_helper::MessageState;
use crate::embeds::{self, single_text_response};

fn guild_id(ctx: &Context<'_>) -> Result<serenity::GuildId, Error> {
    ctx.guild_id().ok_or_else(|| "command must be used in a server".into())
}

/// Assigns IDs to all existing members without one.
#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn assign_existing(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;
    let guild = guild_id(&ctx)?;

    let mut ids = ctx.data().ids.lock().await;
    let assigned = allocator::backfill(
        ctx.serenity_context(),
        guild,
        &mut ids,
        &ctx.data().config.role_prefix,
    )
    .await?;
    drop(ids);

    single_text_response(
        &ctx,
        &format!("Process complete. Assigned IDs to {} existing members.", assigned),
        MessageState::SUCCESS,
        false,
    )
    .await;
    Ok(())
}

/// Displays the unique ID of a specific user.
#[poise::command(slash_command, guild_only)]
pub async fn getid(
    ctx: Context<'_>,
    #[description = "Member to look up"] user: serenity::Member,
) -> Result<(), Error> {
    let ids = ctx.data().ids.lock().await;
    let reply = match ids.get(user.user.id.get()) {
        Some(record) => format!("The ID for {} is **#{}**.", user.mention(), record.id_str),
        None => format!("{} does not have an ID assigned yet.", user.mention()),
    };
    drop(ids);
    single_text_response(&ctx, &reply, MessageState::INFO, false).await;
    Ok(())
}

/// Admin only: wipes all IDs and roles and re-assigns them from scratch.
#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn refreshid(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;
    let guild = guild_id(&ctx)?;

    let mut ids = ctx.data().ids.lock().await;
    allocator::full_reset(
        ctx.serenity_context(),
        guild,
        &mut ids,
        &ctx.data().config.role_prefix,
    )
    .await?;
    drop(ids);

    single_text_response(
        &ctx,
        "All member IDs and roles have been refreshed.",
        MessageState::SUCCESS,
        false,
    )
    .await;
    Ok(())
}

/// Lists all current ID assignments, ordered by ID.
#[poise::command(slash_command, guild_only, required_permissions = "ADMINISTRATOR")]
pub async fn listids(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;
    let guild = guild_id(&ctx)?;

    // Members still in the guild get a live mention; everyone else falls back
    // to a placeholder with their raw user ID.
    let members = allocator::fetch_all_members(ctx.serenity_context(), guild).await?;
    let mentions: HashMap<u64, String> = members
        .iter()
        .map(|member| (member.user.id.get(), member.mention().to_string()))
        .collect();

    let ids = ctx.data().ids.lock().await;
    let rendered = roster::render_roster(&ids.sorted_by_id(), &mentions);
    drop(ids);

    match rendered {
        roster::Roster::Empty => {
            single_text_response(&ctx, "No IDs have been assigned yet.", MessageState::INFO, false).await;
        }
        roster::Roster::TooLong => {
            single_text_response(
                &ctx,
                "The list is too long to display in a single message.",
                MessageState::WARN,
                false,
            )
            .await;
        }
        roster::Roster::Rendered(description) => {
            ctx.send(poise::CreateReply::default().embed(embeds::roster_embed(description))).await?;
        }
    }
    Ok(())
}
