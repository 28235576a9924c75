//! Registration Discord commands - car numbers, display names and profiles.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context, LeagueChoice,
            handlers::{audit, members},
        },
        core::{League, MemberId, audit::AuditEvent, registration::parse_car_number},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Register your car number, display name and flag.
    ///
    /// Registering again replaces the previous registration for the league.
    #[poise::command(slash_command, guild_only, ephemeral)]
    pub async fn register(
        ctx: Context<'_>,
        #[description = "F1 or F2"] league: LeagueChoice,
        #[description = "Car number"]
        #[min = 0]
        #[max = 999]
        carnumber: i64,
        #[description = "Username"] username: String,
        #[description = "Flag emoji"] flag: Option<String>,
    ) -> Result<()> {
        let league = League::from(league);
        let data = ctx.data();
        let config = data.config.leagues.league(league)?;
        let car_number = parse_car_number(carnumber)?;
        let guild_id = ctx.guild_id().ok_or(Error::GuildOnly)?;

        let member = MemberId(ctx.author().id.get());
        let _guard = data.locks.lock(league, member).await;
        let (before, registration) = {
            let mut book = data.registrations.write().await;
            let before = book.get(league, member).cloned();
            let after = book.register(league, member, car_number, &username, flag.as_deref())?;
            (before, after)
        };

        let nickname = registration.nickname();
        members::set_nickname(ctx.serenity_context(), guild_id, ctx.author().id, &nickname).await;
        audit::post(
            ctx.serenity_context(),
            config.update_channel_id,
            &AuditEvent::registration(member, member, before.as_ref(), &registration),
            &ctx.author().name,
        )
        .await;

        ctx.say(format!("✅ Registered as {nickname} in {league}"))
            .await?;
        Ok(())
    }

    /// Claim a car number without a full registration.
    #[poise::command(slash_command, guild_only, ephemeral)]
    pub async fn claim(
        ctx: Context<'_>,
        #[description = "F1 or F2"] league: LeagueChoice,
        #[description = "Car number"]
        #[min = 0]
        #[max = 999]
        carnumber: i64,
    ) -> Result<()> {
        let league = League::from(league);
        let data = ctx.data();
        let config = data.config.leagues.league(league)?;
        let number = parse_car_number(carnumber)?;

        let member = MemberId(ctx.author().id.get());
        let _guard = data.locks.lock(league, member).await;
        let previous = data
            .registrations
            .write()
            .await
            .claim(league, member, number)?;

        audit::post(
            ctx.serenity_context(),
            config.update_channel_id,
            &AuditEvent::claim(league, member, previous, number),
            &ctx.author().name,
        )
        .await;

        let reply = match previous {
            Some(old) => format!("✅ Claimed #{number} in {league} (released #{old})"),
            None => format!("✅ Claimed #{number} in {league}"),
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Give up your standalone car-number claim.
    #[poise::command(slash_command, guild_only, ephemeral)]
    pub async fn unclaim(
        ctx: Context<'_>,
        #[description = "F1 or F2"] league: LeagueChoice,
    ) -> Result<()> {
        let league = League::from(league);
        let data = ctx.data();
        let config = data.config.leagues.league(league)?;

        let member = MemberId(ctx.author().id.get());
        let _guard = data.locks.lock(league, member).await;
        let number = data.registrations.write().await.unclaim(league, member)?;

        audit::post(
            ctx.serenity_context(),
            config.update_channel_id,
            &AuditEvent::unclaim(league, member, number),
            &ctx.author().name,
        )
        .await;

        ctx.say(format!("✅ Released car number #{number} in {league}"))
            .await?;
        Ok(())
    }

    /// Show a member's registration and team placement.
    #[poise::command(slash_command, guild_only, ephemeral)]
    pub async fn profile(
        ctx: Context<'_>,
        #[description = "F1 or F2"] league: LeagueChoice,
        #[description = "User (defaults to you)"] user: Option<serenity::User>,
    ) -> Result<()> {
        let league = League::from(league);
        let data = ctx.data();
        data.config.leagues.league(league)?;

        let target = user.as_ref().unwrap_or_else(|| ctx.author());
        let member = MemberId(target.id.get());

        let mut embed = serenity::CreateEmbed::default()
            .title(format!("{} Profile ({league})", target.name))
            .colour(0x0034_98DB);

        {
            let book = data.registrations.read().await;
            if let Some(reg) = book.get(league, member) {
                embed = embed
                    .field("Car Number", reg.car_number.to_string(), true)
                    .field("Username", reg.display_name.clone(), true)
                    .field("Flag", reg.flag.clone().unwrap_or_else(|| "None".to_string()), true);
            } else {
                embed = embed.field("Registration", "Not registered", false);
            }
            if let Some(number) = book.claim_of(league, member) {
                embed = embed.field("Claimed Number", format!("#{number}"), true);
            }
        }

        if let Some(assignment) = data.roster.read().await.get(league, member) {
            embed = embed
                .field("Team", assignment.team.clone(), true)
                .field("Role", assignment.role.clone(), true);
        } else {
            embed = embed.field("Team Info", "Not signed", false);
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
