//! Discord interaction handlers and side effects
//!
//! Autocomplete, permission checks, member role/nickname updates, the live
//! lineup embed and audit notifications. Side effects other than the reply are
//! best effort: their failures are logged and never undo a store write.

/// Audit embeds posted to each league's update channel
pub mod audit;
/// Autocomplete handlers for team and role names
pub mod autocomplete;
/// Role grants/revokes and nicknames
pub mod members;
/// Live lineup embed refresh
pub mod lineup;
/// League admin and reset checks
pub mod permissions;

use crate::{
    bot::{BotData, Context},
    core::{
        League,
        MemberId,
        audit::{AuditAction, AuditEvent},
        roster::RosterChange,
    },
};
use tracing::warn;

/// Runs the follow-up effects of a sign, move or release: Discord roles, the
/// league's live lineup and the audit embed.
pub async fn after_roster_change(ctx: Context<'_>, action: AuditAction, change: &RosterChange) {
    let data: &BotData = ctx.data();
    let league = change.league;
    let Ok(config) = data.config.leagues.league(league) else {
        return;
    };

    if let Some(guild_id) = ctx.guild_id() {
        members::sync_roles(ctx.http(), guild_id, config, change).await;
    }

    refresh_lineup_logged(ctx, league).await;

    let event = AuditEvent::roster(action, MemberId(ctx.author().id.get()), change);
    audit::post(
        ctx.serenity_context(),
        config.update_channel_id,
        &event,
        &ctx.author().name,
    )
    .await;
}

/// Refreshes `league`'s live lineup, logging instead of failing.
pub async fn refresh_lineup_logged(ctx: Context<'_>, league: League) {
    if let Err(e) = lineup::refresh_live_lineup(ctx.serenity_context(), ctx.data(), league).await {
        warn!(%league, "Live lineup refresh failed: {}", e);
    }
}
