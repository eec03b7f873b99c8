use std::{
    collections::HashSet,
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use jurassicbot::{
    infrastructure::{
        botdata::{Data, ManagementConfig},
        environment::{self, env_var_with_context},
    },
    wordle::WordleConfig,
};
use poise::{
    CreateReply, FrameworkError,
    serenity_prelude::{self as serenity, GatewayIntents, UserId},
};
use sea_orm::DatabaseConnection;
use tracing::{debug, error, info, warn};

pub async fn create_serenity_client(db: DatabaseConnection) -> anyhow::Result<serenity::Client> {
    let token = env_var_with_context(environment::DISCORD_TOKEN)?;
    info!("{} variable found.", environment::DISCORD_TOKEN);
    // Guesses are read from plain chat messages.
    let intents =
        serenity::GatewayIntents::non_privileged().union(GatewayIntents::MESSAGE_CONTENT);
    let data = Data::new(
        db,
        WordleConfig::from_env()?,
        ManagementConfig::from_env()?,
    );
    let framework = create_poise_framework(data);

    serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
        .context("Failed to create serenity client")
}

fn create_poise_framework(data: Data) -> poise::Framework<Data, jurassicbot::Error> {
    let (initialize_owners, owners) = match try_get_owners_env() {
        Ok(owners) => (false, owners),
        Err(OwnerParseError::UserIdParseError(e)) => {
            warn!("Invalid UserId in {}: {}", environment::OWNERS, e);
            (true, HashSet::new())
        }
        Err(OwnerParseError::MissingEnvVar) => (true, HashSet::new()),
    };

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: get_enabled_commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("!".into()),
                mention_as_prefix: true,
                edit_tracker: Some(Arc::new(poise::EditTracker::for_timespan(
                    Duration::from_secs(3600),
                ))),
                ..Default::default()
            },
            initialize_owners,
            owners,
            pre_command: |ctx| {
                Box::pin(async move {
                    info!(
                        "Executing Command: {:?} for {} ({})",
                        ctx.command().qualified_name,
                        ctx.author()
                            .member
                            .as_ref()
                            .and_then(|m| m.nick.clone())
                            .unwrap_or(ctx.author().display_name().to_string()),
                        ctx.author().name,
                    );

                    if let Ok(mut invoc_time) = ctx.data().invoc_time.write() {
                        invoc_time.insert(ctx.id(), Instant::now());
                    }
                })
            },
            post_command: |ctx| {
                Box::pin(async move {
                    let start_time = match ctx.data().invoc_time.write() {
                        Ok(mut invoc_time) => invoc_time.remove(&ctx.id()),
                        Err(_) => None,
                    };
                    match start_time {
                        Some(start_time) => {
                            debug!(
                                "Command {} finished in {:?}",
                                ctx.command().qualified_name,
                                start_time.elapsed()
                            );
                        }
                        None => {
                            error!("Post-command hook called for command without a start-time set.");
                        }
                    }
                })
            },
            on_error: |error| Box::pin(on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(jurassicbot::infrastructure::event_handler::event_handler(
                    ctx, event, framework, data,
                ))
            },
            ..Default::default()
        })
        .setup(|_ctx, _ready, _framework| Box::pin(async move { Ok(data) }))
        .build();

    for cmd in framework.options().commands.iter() {
        info!("Loaded command: {:#?}", cmd.name);
    }

    framework
}

async fn on_error(error: FrameworkError<'_, Data, jurassicbot::Error>) {
    match error {
        FrameworkError::Command { error, ctx, .. } => {
            error!(
                "Command {} failed: {:?}",
                ctx.command().qualified_name,
                error
            );
            let reply = CreateReply::default()
                .content("Something went wrong while running this command.")
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                warn!("Failed to report command error: {:?}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                error!("{:?}", e);
            }
        }
    }
}

/// Lower-cased, non-empty names from a comma separated disable list.
fn parse_disable_list(value: &str) -> HashSet<String> {
    value
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn get_enabled_commands() -> Vec<poise::Command<Data, jurassicbot::Error>> {
    let default_commands = vec![
        jurassicbot::commands::builtins::help(),
        jurassicbot::commands::builtins::register(),
        jurassicbot::commands::wordle::wordle(),
        jurassicbot::commands::wordle::wordle_board(),
        jurassicbot::commands::manage_wordle::manage_wordle(),
    ];

    // Get the list of commands disabled by environment variable
    let disabled_commands = parse_disable_list(
        &std::env::var(environment::COMMAND_DISABLE_LIST).unwrap_or_default(),
    );

    if disabled_commands.is_empty() {
        info!("Loading default commands");
    } else {
        info!("Disabled commands: {:?}", disabled_commands);
    }

    default_commands
        .into_iter()
        .filter(|cmd| !disabled_commands.contains(&cmd.name.to_lowercase()))
        .collect()
}

enum OwnerParseError {
    MissingEnvVar,
    UserIdParseError(String),
}

fn try_get_owners_env() -> Result<HashSet<UserId>, OwnerParseError> {
    let env_var = std::env::var(environment::OWNERS).map_err(|_| OwnerParseError::MissingEnvVar)?;
    parse_owners(&env_var)
}

fn parse_owners(value: &str) -> Result<HashSet<UserId>, OwnerParseError> {
    value
        .split(',')
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map(UserId::new)
                .map_err(|e| OwnerParseError::UserIdParseError(e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disable_list_ignores_case_and_blanks() {
        let disabled = parse_disable_list(" Wordle,,MANAGE-WORDLE ,");
        assert_eq!(disabled.len(), 2);
        assert!(disabled.contains("wordle"));
        assert!(disabled.contains("manage-wordle"));
    }

    #[test]
    fn owners_are_parsed_from_csv() {
        let owners = parse_owners("1, 2").ok().unwrap();
        assert!(owners.contains(&UserId::new(1)));
        assert!(owners.contains(&UserId::new(2)));
        assert!(matches!(
            parse_owners("1,abc"),
            Err(OwnerParseError::UserIdParseError(_))
        ));
    }
}
