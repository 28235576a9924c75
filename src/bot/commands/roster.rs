//! Roster Discord commands - sign, move and release league members.
//!
//! These are restricted to league admins. Each one takes the target member's
//! lock, mutates the roster, then runs the Discord follow-ups (roles, live
//! lineup, audit embed) before replying.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context, LeagueChoice,
            handlers::{self, autocomplete, permissions},
        },
        core::{League, MemberId, audit::AuditAction},
        errors::Result,
    };
    use poise::serenity_prelude as serenity;

    /// Sign a user to a league team and role.
    #[poise::command(slash_command, guild_only, ephemeral)]
    pub async fn sign(
        ctx: Context<'_>,
        #[description = "F1 or F2"] league: LeagueChoice,
        #[description = "User to sign"] user: serenity::User,
        #[description = "Team"]
        #[autocomplete = "autocomplete::autocomplete_team"]
        team: String,
        #[description = "Role"]
        #[autocomplete = "autocomplete::autocomplete_role"]
        role: String,
    ) -> Result<()> {
        let league = League::from(league);
        let data = ctx.data();
        let config = data.config.leagues.league(league)?;
        permissions::require_league_admin(ctx, config).await?;

        let member = MemberId(user.id.get());
        let _guard = data.locks.lock(league, member).await;
        let change = data
            .roster
            .write()
            .await
            .assign(league, member, &team, &role)?;
        handlers::after_roster_change(ctx, AuditAction::Sign, &change).await;

        ctx.say(format!("✅ {member} signed as {role} in {team} ({league})"))
            .await?;
        Ok(())
    }

    /// Move a user to a new team and role.
    #[poise::command(slash_command, guild_only, ephemeral, rename = "move")]
    pub async fn move_member(
        ctx: Context<'_>,
        #[description = "F1 or F2"] league: LeagueChoice,
        #[description = "User to move"] user: serenity::User,
        #[description = "Team"]
        #[autocomplete = "autocomplete::autocomplete_team"]
        team: String,
        #[description = "Role"]
        #[autocomplete = "autocomplete::autocomplete_role"]
        role: String,
    ) -> Result<()> {
        let league = League::from(league);
        let data = ctx.data();
        let config = data.config.leagues.league(league)?;
        permissions::require_league_admin(ctx, config).await?;

        let member = MemberId(user.id.get());
        let _guard = data.locks.lock(league, member).await;
        let change = data
            .roster
            .write()
            .await
            .move_member(league, member, &team, &role)?;

        if change.is_noop() {
            ctx.say(format!("ℹ️ {member} already holds {role} in {team} ({league})"))
                .await?;
            return Ok(());
        }
        handlers::after_roster_change(ctx, AuditAction::Move, &change).await;

        ctx.say(format!("✅ {member} moved to {role} in {team} ({league})"))
            .await?;
        Ok(())
    }

    /// Release a user from all bot-assigned roles in a league.
    #[poise::command(slash_command, guild_only, ephemeral)]
    pub async fn release(
        ctx: Context<'_>,
        #[description = "F1 or F2"] league: LeagueChoice,
        #[description = "User to release"] user: serenity::User,
    ) -> Result<()> {
        let league = League::from(league);
        let data = ctx.data();
        let config = data.config.leagues.league(league)?;
        permissions::require_league_admin(ctx, config).await?;

        let member = MemberId(user.id.get());
        let _guard = data.locks.lock(league, member).await;
        let change = data.roster.write().await.release(league, member)?;
        handlers::after_roster_change(ctx, AuditAction::Release, &change).await;

        ctx.say(format!("✅ {member} has been released from {league}"))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
