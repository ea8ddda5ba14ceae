use std::collections::HashSet;
use std::future::Future;

use poise::serenity_prelude as serenity;
use rand::seq::IndexedRandom;

use crate::Error;
use crate::store::{IdentityStore, MemberRecord, POOL_SIZE};

/// Outcome of running the allocator for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assignment {
    /// The member already had a record; their role was re-attached.
    Restored { display_id: String },
    /// A fresh ID was drawn and recorded.
    Assigned { display_id: String },
    /// Every ID in the pool is taken. Nothing was written.
    Exhausted,
}

impl Assignment {
    pub fn display_id(&self) -> Option<&str> {
        match self {
            Assignment::Restored { display_id } | Assignment::Assigned { display_id } => {
                Some(display_id)
            }
            Assignment::Exhausted => None,
        }
    }
}

pub fn role_name(prefix: &str, display_id: &str) -> String {
    format!("{} #{}", prefix, display_id)
}

/// Discord returns at most this many members per list request.
const MEMBER_PAGE_LIMIT: u64 = 1000;

/// Drains a paginated listing. `fetch` receives the cursor (the ID of the
/// previous page's last entry) and returns one page; a short page ends the
/// walk.
async fn drain_pages<T, F, Fut>(mut fetch: F, id_of: fn(&T) -> u64) -> Result<Vec<T>, Error>
where
    F: FnMut(Option<u64>) -> Fut,
    Fut: Future<Output = Result<Vec<T>, Error>>,
{
    let mut all = Vec::new();
    let mut after = None;
    loop {
        let page = fetch(after).await?;
        let full_page = page.len() as u64 == MEMBER_PAGE_LIMIT;
        after = page.last().map(id_of);
        all.extend(page);
        if !full_page {
            break;
        }
    }
    Ok(all)
}

/// Every member of the guild, walking the member-list endpoint page by page.
pub async fn fetch_all_members(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
) -> Result<Vec<serenity::Member>, Error> {
    let http = &ctx.http;
    drain_pages(
        move |after| async move {
            let page = guild_id
                .members(http, Some(MEMBER_PAGE_LIMIT), after.map(serenity::UserId::new))
                .await?;
            Ok(page)
        },
        |member| member.user.id.get(),
    )
    .await
}

/// A rejoining member keeps their stored ID unchanged; the record is only
/// rewritten when the resolved role differs from the stored handle.
fn refreshed_record(record: &MemberRecord, role_id: u64) -> Option<MemberRecord> {
    if record.role_id == Some(role_id) {
        return None;
    }
    let mut refreshed = record.clone();
    refreshed.role_id = Some(role_id);
    Some(refreshed)
}

/// Picks a free numeric ID uniformly at random from the complement of `used`
/// over [0, POOL_SIZE). O(pool size), which is fine for a 1000-slot pool.
pub fn pick_free_id(used: &[u16]) -> Option<u16> {
    let used: HashSet<u16> = used.iter().copied().collect();
    let available: Vec<u16> = (0..POOL_SIZE).filter(|id| !used.contains(id)).collect();
    available.choose(&mut rand::rng()).copied()
}

/// Ensures the member has an ID and the matching role. Rejoining members get
/// their stored ID back and their role re-attached (recreating it if someone
/// deleted it); new members get a random free ID, a role, and a persisted
/// record. The caller must hold the store lock across this call so that the
/// read-pick-persist sequence never interleaves with another allocation.
pub async fn assign_id_and_role(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    member: &serenity::Member,
    store: &mut IdentityStore,
    role_prefix: &str,
) -> Result<Assignment, Error> {
    let user_id = member.user.id.get();

    if let Some(record) = store.get(user_id) {
        let record = record.clone();
        let name = role_name(role_prefix, &record.id_str);
        let roles = guild_id.roles(&ctx.http).await?;

        // Resolve by the stored role ID first; exact-name match only covers
        // records written before the role ID was tracked.
        let existing = record
            .role_id
            .map(serenity::RoleId::new)
            .filter(|id| roles.contains_key(id))
            .or_else(|| {
                roles
                    .iter()
                    .find(|(_, role)| role.name == name)
                    .map(|(id, _)| *id)
            });

        let role_id = match existing {
            Some(role_id) => {
                tracing::info!(user = %member.user.name, role = %name, "restored role for rejoining member");
                role_id
            }
            None => {
                let role = guild_id
                    .create_role(&ctx.http, serenity::EditRole::new().name(&name))
                    .await?;
                tracing::info!(user = %member.user.name, role = %name, "re-created role for rejoining member");
                role.id
            }
        };
        member.add_role(&ctx.http, role_id).await?;

        if let Some(refreshed) = refreshed_record(&record, role_id.get()) {
            store.put(user_id, refreshed)?;
        }
        return Ok(Assignment::Restored {
            display_id: record.id_str,
        });
    }

    let used = store.used_ids();
    let Some(numeric_id) = pick_free_id(&used) else {
        tracing::warn!(user = %member.user.name, "no available IDs left to assign");
        return Ok(Assignment::Exhausted);
    };

    let mut record = MemberRecord::new(numeric_id, member.user.name.clone(), None);
    let name = role_name(role_prefix, &record.id_str);

    // An externally-created role with the exact name wins over creating a
    // duplicate; first match is authoritative.
    let roles = guild_id.roles(&ctx.http).await?;
    let role_id = match roles.iter().find(|(_, role)| role.name == name) {
        Some((role_id, _)) => *role_id,
        None => {
            guild_id
                .create_role(&ctx.http, serenity::EditRole::new().name(&name))
                .await?
                .id
        }
    };
    member.add_role(&ctx.http, role_id).await?;

    record.role_id = Some(role_id.get());
    let display_id = record.id_str.clone();
    store.put(user_id, record)?;
    tracing::info!(user = %member.user.name, id = %display_id, "assigned ID to new member");
    Ok(Assignment::Assigned { display_id })
}

/// Assigns IDs to every non-bot member who does not have one yet. Returns how
/// many members were newly assigned.
pub async fn backfill(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    store: &mut IdentityStore,
    role_prefix: &str,
) -> Result<usize, Error> {
    let members = fetch_all_members(ctx, guild_id).await?;
    let mut assigned = 0;
    for member in &members {
        if member.user.bot || store.contains(member.user.id.get()) {
            continue;
        }
        match assign_id_and_role(ctx, guild_id, member, store, role_prefix).await? {
            Assignment::Assigned { .. } => assigned += 1,
            Assignment::Restored { .. } => {}
            Assignment::Exhausted => break,
        }
    }
    Ok(assigned)
}

/// Wipes all records, deletes every role carrying the ID naming convention,
/// then reassigns every non-bot member from scratch. Each reassignment
/// persists individually; there is no all-or-nothing guarantee.
pub async fn full_reset(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    store: &mut IdentityStore,
    role_prefix: &str,
) -> Result<(), Error> {
    store.clear();

    let marker = format!("{} #", role_prefix);
    let roles = guild_id.roles(&ctx.http).await?;
    for (role_id, role) in roles {
        if !role.name.starts_with(&marker) {
            continue;
        }
        if let Err(error) = guild_id.delete_role(&ctx.http, role_id).await {
            tracing::warn!(role = %role.name, %error, "could not delete ID role, continuing");
        }
    }

    for member in fetch_all_members(ctx, guild_id).await? {
        if member.user.bot {
            continue;
        }
        assign_id_and_role(ctx, guild_id, &member, store, role_prefix).await?;
    }
    Ok(())
}
