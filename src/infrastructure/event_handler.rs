use std::time::Duration;

use poise::serenity_prelude::{Context, FullEvent};
use tracing::{debug, info};

use crate::{Error, infrastructure::botdata::Data};

pub async fn event_handler(
    ctx: &Context,
    event: &FullEvent,
    framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        FullEvent::Ready { data_about_bot, .. } => {
            info!(
                guilds = data_about_bot.guilds.len(),
                "Bot is ready. Logged in as {}", data_about_bot.user.name
            );
        }
        FullEvent::Resume { .. } => {
            info!(
                active_sessions = data.sessions.len(),
                "Gateway session resumed"
            );
        }
        FullEvent::InteractionCreate { interaction } => {
            let ping = match framework
                .shard_manager
                .runners
                .lock()
                .await
                .get(&ctx.shard_id)
            {
                Some(runner) => runner.latency.unwrap_or(Duration::ZERO),
                None => {
                    tracing::error!(
                        "current shard is not in shard_manager.runners, this shouldn't happen"
                    );
                    Duration::ZERO
                }
            };
            if ping > Duration::default() {
                debug!(
                    "Ping measured for interaction type {:?}: {:?} ",
                    interaction.kind(),
                    ping
                )
            }
        }
        _ => {}
    }
    Ok(())
}
