//! Bot layer - Discord-specific interface and command handlers
//!
//! This module wires the framework-agnostic stores into poise: shared bot data,
//! the error hook, startup (command registration, initial lineup refresh) and
//! the gateway client.

/// Discord command implementations (roster, registration, lineup, general)
pub mod commands;
/// Discord side effects and interaction handlers (autocomplete, roles, embeds)
pub mod handlers;

use crate::{
    config::{AppConfig, storage::get_dev_guild_id},
    core::{
        League,
        lineup::LiveLineupBoard,
        locks::MemberLocks,
        registration::RegistrationBook,
        roster::RosterStore,
    },
    errors::{Error, Result},
    storage::Persistence,
};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands.
///
/// The stores sit behind async locks that are only held for the store call
/// itself; per-member ordering across Discord calls comes from `locks`.
#[derive(Debug)]
pub struct BotData {
    /// Validated league configuration
    pub config: Arc<AppConfig>,
    /// Team/role assignments for both leagues
    pub roster: RwLock<RosterStore>,
    /// Car-number registrations and claims
    pub registrations: RwLock<RegistrationBook>,
    /// Message ids of the live lineup embeds
    pub live_lineups: Mutex<LiveLineupBoard>,
    /// Per-member guards for mutating commands
    pub locks: MemberLocks,
}

impl BotData {
    /// Loads every store from `persistence`.
    pub fn open(config: Arc<AppConfig>, persistence: &Arc<dyn Persistence>) -> Result<Self> {
        let leagues = Arc::new(config.leagues.clone());
        Ok(Self {
            roster: RwLock::new(RosterStore::open(leagues, Arc::clone(persistence))?),
            registrations: RwLock::new(RegistrationBook::open(Arc::clone(persistence))?),
            live_lineups: Mutex::new(LiveLineupBoard::open(Arc::clone(persistence))?),
            locks: MemberLocks::new(),
            config,
        })
    }
}

/// The league argument of every league-scoped command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
pub enum LeagueChoice {
    /// F1 league
    F1,
    /// F2 league
    F2,
}

impl From<LeagueChoice> for League {
    fn from(choice: LeagueChoice) -> Self {
        match choice {
            LeagueChoice::F1 => Self::F1,
            LeagueChoice::F2 => Self::F2,
        }
    }
}

/// Poise context with our data and error types.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            if error.is_user_facing() {
                info!("Command `{}` rejected: {}", ctx.command().name, error);
            } else {
                error!("Error in command `{}`: {:?}", ctx.command().name, error);
            }
            let reply = poise::CreateReply::default()
                .content(error.user_message())
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// All commands the bot registers.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::sign(),
        commands::move_member(),
        commands::release(),
        commands::register(),
        commands::claim(),
        commands::unclaim(),
        commands::profile(),
        commands::lineupyear(),
        commands::resetdata(),
        commands::help(),
        commands::ping(),
    ]
}

/// Builds the poise framework and runs the gateway client until it stops.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                if let Some(guild_id) = get_dev_guild_id() {
                    let guild_id = serenity::GuildId::new(guild_id);
                    poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id)
                        .await?;
                    info!("Registered commands in guild {}", guild_id);
                } else {
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                    info!("Registered commands globally");
                }

                for (league, _) in data.config.leagues.configured() {
                    if let Err(e) = handlers::lineup::refresh_live_lineup(ctx, &data, league).await {
                        warn!(%league, "Initial lineup refresh failed: {}", e);
                    }
                }
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILDS;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}
