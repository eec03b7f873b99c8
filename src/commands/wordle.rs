use poise::{
    CreateReply,
    serenity_prelude::{CreateEmbed, CreateEmbedFooter, Message, MessageCollector, futures::StreamExt},
};
use tracing::{debug, error, info, trace};

use crate::{
    Context, Error,
    infrastructure::{
        colors,
        util::{DebuggableReply, delete_after, reply_or_send},
    },
    poise_instrument, record_ctx_fields,
    wordle::{
        Round, RoundState, render,
        round::{GuessError, PlayerInput},
        word_bank,
    },
};

async fn send_ephemeral(ctx: Context<'_>, content: impl Into<String>) -> Result<(), Error> {
    ctx.send(CreateReply::default().content(content).ephemeral(true))
        .await?;
    Ok(())
}

/// What to send back for one message from the player.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Turn {
    /// A reply to the message. `over` is set once the round has ended.
    Reply { content: String, over: bool },
    /// A short lived warning, deleted after the configured lifetime.
    Warning(String),
    Ignored,
    /// The round was already over; nothing to send.
    Ended,
}

/// Applies one message to the round. Pure game logic, so it can run while the
/// session is locked without waiting on Discord.
fn take_turn(round: &mut Round, content: &str) -> Turn {
    match round.interpret(content) {
        PlayerInput::Quit => {
            round.abandon();
            Turn::Reply {
                content: format!("🏳️ Game stopped. The word was **{}**.", round.secret()),
                over: true,
            }
        }
        PlayerInput::WrongLength { expected } => {
            Turn::Warning(format!("⚠️ Word must be **{}** letters long!", expected))
        }
        PlayerInput::Invalid => {
            trace!("Ignoring guess with characters outside the alphabet");
            Turn::Ignored
        }
        PlayerInput::Guess(guess) => {
            let row = match round.submit_guess(&guess) {
                Ok(attempt) => render::row(&attempt.statuses),
                Err(GuessError::Expired) => {
                    return Turn::Reply {
                        content: format!("⏰ Time's up! The word was **{}**.", round.secret()),
                        over: true,
                    };
                }
                Err(e) => {
                    debug!("Guess rejected: {}", e);
                    return if round.is_over() { Turn::Ended } else { Turn::Ignored };
                }
            };

            let content = match round.state() {
                RoundState::Won => format!(
                    "{}\n✅ Correct! The word was **{}**.",
                    row,
                    round.secret()
                ),
                RoundState::Lost => format!(
                    "{}\n💀 Game Over. The word was **{}**.\n{}",
                    row,
                    round.secret(),
                    render::status_footer(round)
                ),
                _ => format!("{}\n{}", row, render::status_footer(round)),
            };
            Turn::Reply {
                content,
                over: round.is_over(),
            }
        }
    }
}

/// Sends the response for a turn. Returns true once the round is over.
async fn send_turn(ctx: Context<'_>, message: &Message, turn: Turn) -> bool {
    let serenity_ctx = ctx.serenity_context();
    match turn {
        Turn::Reply { content, over } => {
            reply_or_send(serenity_ctx, message, content).await;
            over
        }
        Turn::Warning(content) => {
            if let Some(warning) = reply_or_send(serenity_ctx, message, content).await {
                delete_after(
                    serenity_ctx.http.clone(),
                    warning,
                    ctx.data().wordle.warning_lifetime,
                );
            }
            false
        }
        Turn::Ignored => false,
        Turn::Ended => true,
    }
}

poise_instrument! {
    /// Starts a round of Jurassic Wordle in this channel.
    #[poise::command(slash_command, prefix_command, category = "Fun")]
    pub async fn wordle(ctx: Context<'_>) -> Result<(), Error> {
        record_ctx_fields!(ctx);
        let data = ctx.data();
        let user_id = ctx.author().id;

        let Ok(reservation) = data.sessions.reserve(user_id) else {
            return send_ephemeral(
                ctx,
                format!(
                    "⚠️ You already have a game in progress! Finish it or type **'{}'** to quit.",
                    data.wordle.quit_phrase.to_lowercase()
                ),
            )
            .await;
        };

        let secret = match word_bank::random_word(&data.db_pool).await {
            Ok(Some(word)) => word,
            Ok(None) => return send_ephemeral(ctx, "❌ Database is empty!").await,
            Err(e) => {
                error!("Failed to draw a secret word: {}", e);
                return send_ephemeral(ctx, "❌ Database error.").await;
            }
        };

        let round = Round::new(&secret, &data.wordle);
        let intro = render::intro(&round, &data.wordle.quit_phrase);
        let window = round.time_left();
        let session = reservation.activate(round);
        ctx.say(intro).await?;

        let mut messages = std::pin::pin!(
            MessageCollector::new(ctx.serenity_context())
                .author_id(user_id)
                .channel_id(ctx.channel_id())
                .timeout(window)
                .stream()
        );

        while let Some(message) = messages.next().await {
            let turn = take_turn(&mut *session.lock().await, &message.content);
            if send_turn(ctx, &message, turn).await {
                break;
            }
        }

        let timed_out = {
            let mut round = session.lock().await;
            let notice = (!round.is_over()).then(|| {
                round.time_out();
                format!("⏰ Time's up! The word was **{}**.", round.secret())
            });
            info!(
                state = ?round.state(),
                attempts = round.attempts().len(),
                "Wordle round ended"
            );
            notice
        };
        if let Some(notice) = timed_out {
            ctx.say(notice).await?;
        }
        Ok(())
    }

    /// Shows your current Wordle board.
    #[poise::command(slash_command, prefix_command, rename = "wordle-board", category = "Fun")]
    pub async fn wordle_board(ctx: Context<'_>) -> Result<(), Error> {
        record_ctx_fields!(ctx);
        let Some(session) = ctx.data().sessions.lookup(&ctx.author().id) else {
            return send_ephemeral(ctx, "You don't have a game in progress. Start one with `/wordle`.")
                .await;
        };

        let embed = {
            let round = session.lock().await;
            let board = if round.attempts().is_empty() {
                render::empty_row(round.len())
            } else {
                render::board(round.attempts())
            };
            CreateEmbed::new()
                .title("Jurassic Wordle")
                .description(board)
                .field("Length", round.len().to_string(), true)
                .field(
                    "Guesses left",
                    round.remaining_attempts().to_string(),
                    true,
                )
                .field("Discarded", render::discarded_list(round.discarded()), true)
                .field("Ends", render::relative_timestamp(round.ends_at()), true)
                .footer(CreateEmbedFooter::new(format!(
                    "Type '{}' to give up.",
                    ctx.data().wordle.quit_phrase.to_lowercase()
                )))
                .color(colors::yellow())
        };

        let reply = CreateReply::default().embed(embed).ephemeral(true);
        trace!("Sending reply: {:?}", DebuggableReply::new(&reply));
        ctx.send(reply).await?;
        Ok(())
    }
}
