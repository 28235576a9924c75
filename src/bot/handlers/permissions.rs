//! Permission checks for admin-only commands.

use crate::{
    bot::Context,
    config::LeagueConfig,
    errors::{Error, Result},
};

/// Role ids held by the invoking member.
async fn author_role_ids(ctx: Context<'_>) -> Result<Vec<u64>> {
    let member = ctx.author_member().await.ok_or(Error::GuildOnly)?;
    Ok(member.roles.iter().map(|role| role.get()).collect())
}

/// Fails with `Unauthorized` unless the invoker holds one of the league's admin
/// roles or is allowed to reset the bot.
pub async fn require_league_admin(ctx: Context<'_>, config: &LeagueConfig) -> Result<()> {
    if ctx.data().config.can_reset(ctx.author().id.get()) {
        return Ok(());
    }
    let roles = author_role_ids(ctx).await?;
    if config.is_admin(&roles) {
        Ok(())
    } else {
        tracing::info!(user = %ctx.author().name, "Rejected admin command");
        Err(Error::Unauthorized)
    }
}

/// Fails with `Unauthorized` unless the invoker is listed in `reset_user_ids`.
pub fn require_reset_user(ctx: Context<'_>) -> Result<()> {
    if ctx.data().config.can_reset(ctx.author().id.get()) {
        Ok(())
    } else {
        Err(Error::Unauthorized)
    }
}
