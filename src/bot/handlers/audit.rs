//! Audit embeds for the league update channels.

use crate::core::audit::AuditEvent;
use poise::serenity_prelude as serenity;
use tracing::warn;

/// Builds the embed for an audit event; `actor_name` goes in the footer.
#[must_use]
pub fn audit_embed(event: &AuditEvent, actor_name: &str) -> serenity::CreateEmbed {
    let mut embed = serenity::CreateEmbed::default()
        .title(event.title())
        .description(event.describe())
        .colour(event.action.colour())
        .footer(serenity::CreateEmbedFooter::new(format!(
            "Action by {actor_name}"
        )));
    if let Ok(timestamp) = serenity::Timestamp::from_unix_timestamp(event.at.timestamp()) {
        embed = embed.timestamp(timestamp);
    }
    embed
}

/// Posts `event` to `channel_id`, logging on failure.
pub async fn post(ctx: &serenity::Context, channel_id: u64, event: &AuditEvent, actor_name: &str) {
    let channel = serenity::ChannelId::new(channel_id);
    let message = serenity::CreateMessage::new().embed(audit_embed(event, actor_name));
    if let Err(e) = channel.send_message(ctx, message).await {
        warn!(channel_id, action = %event.action, "Failed to post audit embed: {}", e);
    }
}
