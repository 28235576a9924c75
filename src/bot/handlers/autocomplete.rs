//! Autocomplete handlers for Discord slash command parameters.
//!
//! Team and role names depend on the league picked earlier in the same
//! command, so the handlers read the `league` option straight from the
//! interaction before filtering.

use crate::{
    bot::Context,
    config::LeagueConfig,
    core::League,
};
use poise::serenity_prelude as serenity;

/// Discord shows at most this many suggestions.
const AUTOCOMPLETE_LIMIT: usize = 25;

/// League already chosen in the command being completed.
fn selected_league(ctx: Context<'_>) -> Option<League> {
    let poise::Context::Application(app) = ctx else {
        return None;
    };
    app.interaction
        .data
        .options()
        .into_iter()
        .find(|option| option.name == "league")
        .and_then(|option| match option.value {
            // Choice parameters arrive as their index
            serenity::ResolvedValue::Integer(index) => usize::try_from(index)
                .ok()
                .and_then(|index| League::ALL.get(index).copied()),
            serenity::ResolvedValue::String(raw) => raw.parse().ok(),
            _ => None,
        })
}

/// Names containing `partial` (case-insensitive), in configured order.
#[must_use]
pub fn matching_names<'a>(names: impl IntoIterator<Item = &'a str>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    names
        .into_iter()
        .filter(|name| name.to_lowercase().contains(&partial_lower))
        .map(str::to_string)
        .take(AUTOCOMPLETE_LIMIT)
        .collect()
}

fn league_config(ctx: Context<'_>) -> Option<&LeagueConfig> {
    let league = selected_league(ctx)?;
    ctx.data().config.leagues.league(league).ok()
}

/// Suggests team names of the selected league.
pub async fn autocomplete_team(ctx: Context<'_>, partial: &str) -> Vec<String> {
    league_config(ctx).map_or_else(Vec::new, |config| {
        matching_names(config.teams.iter().map(|team| team.name.as_str()), partial)
    })
}

/// Suggests role names of the selected league.
pub async fn autocomplete_role(ctx: Context<'_>, partial: &str) -> Vec<String> {
    league_config(ctx).map_or_else(Vec::new, |config| {
        matching_names(config.roles.iter().map(|role| role.name.as_str()), partial)
    })
}
