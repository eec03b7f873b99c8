/*!

Administration of the Wordle word bank: adding, bulk adding, editing, removing and exporting words.

Every change is echoed to the audit channel when one is configured.

*/

use poise::{
    CreateReply,
    serenity_prelude::{
        CreateAttachment, CreateEmbed,
        futures::{self, Stream},
    },
};
use tracing::{debug, trace, warn};

use crate::{
    Context, Error,
    entities::wordle_word,
    infrastructure::{
        botdata::Data,
        colors,
        ids::id_to_string,
        util::{DebuggableReply, defer_or_broadcast, send_message_from_reply},
    },
    poise_instrument, record_ctx_fields,
    wordle::word_bank::{self, WordBankError, WordCategory},
};

/// Discord rejects messages over 2000 characters; leave room for the header.
const MAX_AUDIT_TEXT_LEN: usize = 1950;
const AUTOCOMPLETE_LIMIT: u64 = 25;

#[derive(Debug, poise::Modal)]
#[name = "Bulk Add Words"]
struct BulkAddModal {
    #[name = "Enter words (comma/newline separated)"]
    #[placeholder = "velociraptor, dilophosaurus"]
    #[paragraph]
    words: String,
}

/// Staff or administrators only. Permissions are only populated for slash commands.
async fn is_word_manager(ctx: Context<'_>) -> Result<bool, Error> {
    let Some(member) = ctx.author_member().await else {
        return Ok(false);
    };
    if let Some(staff_role) = ctx.data().management.staff_role
        && member.roles.contains(&staff_role)
    {
        return Ok(true);
    }
    Ok(member
        .permissions
        .is_some_and(|permissions| permissions.administrator()))
}

async fn word_autocomplete<'a>(
    ctx: Context<'a>,
    partial: &'a str,
) -> impl Stream<Item = String> + 'a {
    debug!(partial = partial, "word_autocomplete executed with args");
    let words = word_bank::search_words(&ctx.data().db_pool, partial, AUTOCOMPLETE_LIMIT)
        .await
        .unwrap_or_else(|e| {
            warn!("Word autocomplete failed: {}", e);
            Vec::new()
        });
    futures::stream::iter(words)
}

/// Turns an expected word bank failure into a message for the user. Database
/// failures are passed on to the framework's error handler.
fn user_message(error: WordBankError) -> Result<String, Error> {
    match error {
        WordBankError::Empty(raw) => Ok(format!("⚠️ **{}** has no usable letters.", raw)),
        WordBankError::Duplicate(word) => Ok(format!("⚠️ The word **{}** already exists.", word)),
        WordBankError::NotFound(word) => Ok(format!("❌ Word **{}** not found.", word)),
        WordBankError::NothingToChange => {
            Ok("⚠️ You must provide either a `new_word` or a `category` to edit.".into())
        }
        WordBankError::Database(e) => Err(e.into()),
    }
}

fn json_block(model: &wordle_word::Model) -> Result<String, Error> {
    Ok(format!(
        "```json\n{}\n```",
        serde_json::to_string_pretty(model)?
    ))
}

/// The bulk add log as a JSON list of words, or `None` when it is too long to
/// post as text.
fn bulk_log_text(header: &str, added: &[wordle_word::Model]) -> Option<String> {
    let list = added
        .iter()
        .map(|m| format!("\"{}\"", m.word))
        .collect::<Vec<_>>()
        .join(",\n");
    let text = format!("{}\n```json\n[\n{}\n]\n```", header, list);
    (text.len() < MAX_AUDIT_TEXT_LEN).then_some(text)
}

fn audit_header(ctx: Context<'_>, action: &str) -> String {
    format!(
        "**{}** by {} ({})",
        action,
        ctx.author().name,
        ctx.author().id
    )
}

/// Posts to the audit channel. Failures are logged and otherwise ignored.
async fn send_audit(ctx: Context<'_>, reply: CreateReply) {
    let Some(channel) = ctx.data().management.log_channel else {
        trace!("No audit channel configured");
        return;
    };
    if let Err(e) = send_message_from_reply(&channel, ctx.serenity_context(), reply).await {
        warn!("Failed to send audit log: {:?}", e);
    }
}

async fn reply_ephemeral(ctx: Context<'_>, content: impl Into<String>) -> Result<(), Error> {
    let reply = CreateReply::default().content(content).ephemeral(true);
    trace!("Sending reply: {:?}", DebuggableReply::new(&reply));
    ctx.send(reply).await?;
    Ok(())
}

#[poise::command(
    slash_command,
    rename = "manage-wordle",
    default_member_permissions = "ADMINISTRATOR",
    guild_only,
    category = "Management",
    subcommands("add", "bulk_add", "edit", "remove", "export")
)]
pub async fn manage_wordle(_ctx: Context<'_>) -> Result<(), Error> {
    Ok(())
}

poise_instrument! {
    /// Adds a single word to the Wordle word bank.
    #[poise::command(slash_command, guild_only, check = "is_word_manager", category = "Management")]
    async fn add(
        ctx: Context<'_>,
        #[description = "The word"] word: String,
        #[description = "Category"] category: WordCategory,
    ) -> Result<(), Error> {
        record_ctx_fields!(ctx);
        let _typing = defer_or_broadcast(ctx, true).await?;
        let data = ctx.data();
        let added_by = id_to_string(ctx.author().id);

        match word_bank::add_word(&data.db_pool, &data.wordle.alphabet, &word, category, &added_by)
            .await
        {
            Ok(model) => {
                let header = audit_header(ctx, "Wordle Added");
                send_audit(
                    ctx,
                    CreateReply::default().content(format!("{}\n{}", header, json_block(&model)?)),
                )
                .await;
                reply_ephemeral(ctx, format!("✅ Added **{}**", model.word)).await
            }
            Err(e) => reply_ephemeral(ctx, user_message(e)?).await,
        }
    }

    /// Adds several words at once through a form.
    #[poise::command(
        slash_command,
        rename = "bulk-add",
        guild_only,
        check = "is_word_manager",
        category = "Management"
    )]
    async fn bulk_add(
        ctx: poise::ApplicationContext<'_, Data, Error>,
        #[description = "Category for all words"] category: WordCategory,
    ) -> Result<(), Error> {
        let ctx_any = poise::Context::Application(ctx);
        record_ctx_fields!(ctx_any);

        let modal = poise::execute_modal::<_, _, BulkAddModal>(
            ctx,
            None,
            Some(std::time::Duration::from_secs(300)),
        )
        .await?;
        let Some(BulkAddModal { words }) = modal else {
            debug!("Bulk add form was not submitted in time");
            return Ok(());
        };

        let data = ctx_any.data();
        let added_by = id_to_string(ctx_any.author().id);
        let report = word_bank::add_words(
            &data.db_pool,
            &data.wordle.alphabet,
            &words,
            category,
            &added_by,
        )
        .await;

        if !report.added.is_empty() {
            let header = audit_header(ctx_any, "Wordle Bulk Added");
            let audit = match bulk_log_text(&header, &report.added) {
                Some(text) => CreateReply::default().content(text),
                None => CreateReply::default()
                    .content(format!("{}\n(Log too large for text, see attached file)", header))
                    .attachment(CreateAttachment::bytes(
                        serde_json::to_vec_pretty(&report.added)?,
                        "bulk_log.json",
                    )),
            };
            send_audit(ctx_any, audit).await;
        }

        let errors = if report.errors.is_empty() {
            "None".to_string()
        } else {
            report.errors.join(", ")
        };
        reply_ephemeral(
            ctx_any,
            format!(
                "✅ Bulk process complete.\n**Added:** {}\n**Errors:** {}",
                report.added.len(),
                errors
            ),
        )
        .await
    }

    /// Renames a word or changes its category.
    #[poise::command(slash_command, guild_only, check = "is_word_manager", category = "Management")]
    async fn edit(
        ctx: Context<'_>,
        #[description = "The current word to find"]
        #[autocomplete = "word_autocomplete"]
        target_word: String,
        #[description = "New spelling (Optional)"] new_word: Option<String>,
        #[description = "New category (Optional)"] category: Option<WordCategory>,
    ) -> Result<(), Error> {
        record_ctx_fields!(ctx);
        let _typing = defer_or_broadcast(ctx, true).await?;
        let data = ctx.data();

        match word_bank::edit_word(
            &data.db_pool,
            &data.wordle.alphabet,
            &target_word,
            new_word.as_deref(),
            category,
        )
        .await
        {
            Ok(edit) => {
                let header = audit_header(ctx, "Wordle Edited");
                send_audit(
                    ctx,
                    CreateReply::default()
                        .content(format!("{}\n```diff\n{}\n```", header, edit.diff())),
                )
                .await;
                reply_ephemeral(
                    ctx,
                    format!(
                        "✅ Updated **{}** (Name: {}, Cat: {})",
                        edit.before.word, edit.after.word, edit.after.category
                    ),
                )
                .await
            }
            Err(e) => reply_ephemeral(ctx, user_message(e)?).await,
        }
    }

    /// Removes a word from the word bank.
    #[poise::command(slash_command, guild_only, check = "is_word_manager", category = "Management")]
    async fn remove(
        ctx: Context<'_>,
        #[description = "The word to remove"]
        #[autocomplete = "word_autocomplete"]
        target_word: String,
    ) -> Result<(), Error> {
        record_ctx_fields!(ctx);
        let _typing = defer_or_broadcast(ctx, true).await?;
        let data = ctx.data();

        match word_bank::remove_word(&data.db_pool, &data.wordle.alphabet, &target_word).await {
            Ok(model) => {
                let header = audit_header(ctx, "Wordle Deleted");
                send_audit(
                    ctx,
                    CreateReply::default().content(format!("{}\n{}", header, json_block(&model)?)),
                )
                .await;
                reply_ephemeral(ctx, format!("✅ Removed **{}**.", model.word)).await
            }
            Err(e) => reply_ephemeral(ctx, user_message(e)?).await,
        }
    }

    /// Exports the whole word bank as JSON.
    #[poise::command(slash_command, guild_only, check = "is_word_manager", category = "Management")]
    async fn export(ctx: Context<'_>) -> Result<(), Error> {
        record_ctx_fields!(ctx);
        let _typing = defer_or_broadcast(ctx, true).await?;

        let words = word_bank::export_words(&ctx.data().db_pool).await?;
        let reply = CreateReply::default()
            .content("📂 Wordle Database Backup:")
            .embed(
                CreateEmbed::new()
                    .description(format!("{} words", words.len()))
                    .color(colors::green()),
            )
            .attachment(CreateAttachment::bytes(
                serde_json::to_vec_pretty(&words)?,
                "wordle_export.json",
            ))
            .ephemeral(true);
        trace!("Sending reply: {:?}", DebuggableReply::new(&reply));
        ctx.send(reply).await?;
        Ok(())
    }
}
