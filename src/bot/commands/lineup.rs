//! Lineup Discord commands.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, LeagueChoice, handlers::lineup},
        core::League,
        errors::Result,
    };

    /// Refresh the live team lineup of a league.
    #[poise::command(slash_command, guild_only, ephemeral)]
    pub async fn lineupyear(
        ctx: Context<'_>,
        #[description = "F1 or F2"] league: LeagueChoice,
    ) -> Result<()> {
        let league = League::from(league);
        let data = ctx.data();
        data.config.leagues.league(league)?;

        lineup::refresh_live_lineup(ctx.serenity_context(), data, league).await?;
        ctx.say(format!("✅ {league} live lineup updated.")).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
