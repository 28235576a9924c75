//! General Discord commands - ping, help and the full data reset.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context,
            handlers::{self, audit, permissions},
        },
        core::{MemberId, audit::AuditEvent},
        errors::Result,
    };
    use tracing::warn;

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, ephemeral)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, ephemeral)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**Lineup Bot Help**\n\n\
        **Roster Commands** (league admins)\n\
        • `/sign <league> <user> <team> <role>` - Sign a user to a team and role.\n\
        • `/move <league> <user> <team> <role>` - Move a user to a new team and role.\n\
        • `/release <league> <user>` - Remove a user from all bot roles.\n\n\
        **Driver Commands**\n\
        • `/register <league> <carnumber> <username> [flag]` - Register car number, username and flag.\n\
        • `/claim <league> <carnumber>` - Reserve a car number.\n\
        • `/unclaim <league>` - Give up your reserved car number.\n\
        • `/profile <league> [user]` - Show a user profile.\n\
        • `/lineupyear <league>` - Refresh the live team lineup.\n\n\
        **Utility Commands**\n\
        • `/resetdata` - Reset all bot data (restricted).\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Reset all bot data: assignments, registrations, claims and lineup messages.
    ///
    /// Discord roles already granted are left in place.
    #[poise::command(slash_command, guild_only, ephemeral)]
    pub async fn resetdata(ctx: Context<'_>) -> Result<()> {
        permissions::require_reset_user(ctx)?;
        let data = ctx.data();

        data.roster.write().await.reset()?;
        data.registrations.write().await.reset()?;
        data.live_lineups.lock().await.reset()?;
        warn!(user = %ctx.author().name, "All bot data reset");

        let event = AuditEvent::reset(MemberId(ctx.author().id.get()));
        for (league, config) in data.config.leagues.configured() {
            audit::post(
                ctx.serenity_context(),
                config.update_channel_id,
                &event,
                &ctx.author().name,
            )
            .await;
            handlers::refresh_lineup_logged(ctx, league).await;
        }

        ctx.say("✅ All bot data reset!").await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
