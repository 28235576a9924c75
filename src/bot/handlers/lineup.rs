//! Live lineup embed: edited in place when the previous message still exists,
//! otherwise sent fresh and remembered.

use crate::{
    bot::BotData,
    core::{League, lineup::LineupView},
    errors::Result,
};
use poise::serenity_prelude as serenity;
use tracing::{debug, info};

/// Gold
const LINEUP_COLOUR: u32 = 0x00F1_C40F;

/// Builds the embed for a rendered lineup.
#[must_use]
pub fn lineup_embed(view: &LineupView) -> serenity::CreateEmbed {
    serenity::CreateEmbed::default()
        .title(&view.title)
        .colour(LINEUP_COLOUR)
        .fields(
            view.fields
                .iter()
                .map(|(name, value)| (name.clone(), value.clone(), false)),
        )
        .footer(serenity::CreateEmbedFooter::new(&view.footer))
        .timestamp(serenity::Timestamp::now())
}

/// Discord's JSON error code for a deleted or unknown message.
const UNKNOWN_MESSAGE_CODE: isize = 10008;

/// Whether an HTTP status and Discord error code mean the message no longer exists.
fn is_gone(status: Option<u16>, code: Option<isize>) -> bool {
    status == Some(404) || code == Some(UNKNOWN_MESSAGE_CODE)
}

/// Only a vanished message warrants a repost; rate limits and outages are returned.
fn is_missing_message(error: &serenity::Error) -> bool {
    match error {
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response)) => is_gone(
            Some(response.status_code.as_u16()),
            Some(response.error.code),
        ),
        _ => false,
    }
}

/// Re-renders `league`'s lineup into its live message.
///
/// A stored message that was deleted is replaced by a new one; any other edit
/// failure is returned and the stored id is kept.
///
/// The board lock is held for the whole edit-or-send so two refreshes cannot
/// both decide to send a new message.
pub async fn refresh_live_lineup(
    ctx: &serenity::Context,
    data: &BotData,
    league: League,
) -> Result<()> {
    let config = data.config.leagues.league(league)?;
    let view = data.roster.read().await.snapshot(league)?.render()?;
    let embed = lineup_embed(&view);
    let channel = serenity::ChannelId::new(config.live_lineup_channel_id);

    let mut board = data.live_lineups.lock().await;
    if let Some(message_id) = board.get(league).filter(|id| *id != 0) {
        match channel
            .edit_message(
                ctx,
                serenity::MessageId::new(message_id),
                serenity::EditMessage::new().embed(embed.clone()),
            )
            .await
        {
            Ok(_) => {
                debug!(%league, message_id, "Live lineup edited");
                return Ok(());
            }
            Err(e) if is_missing_message(&e) => {
                info!(%league, message_id, "Live lineup message gone, sending a new one: {}", e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let message = channel
        .send_message(ctx, serenity::CreateMessage::new().embed(embed))
        .await?;
    board.set(league, message.id.get())?;
    info!(%league, message_id = message.id.get(), "Live lineup posted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unknown_message_triggers_repost() {
        assert!(is_gone(Some(404), Some(UNKNOWN_MESSAGE_CODE)));
        assert!(is_gone(Some(404), None));
        assert!(!is_gone(Some(429), Some(0)));
        assert!(!is_gone(Some(503), None));
        assert!(!is_gone(None, None));
    }

    #[test]
    fn test_non_http_errors_do_not_repost() {
        let error = serenity::Error::Other("gateway timeout");
        assert!(!is_missing_message(&error));
    }
}
