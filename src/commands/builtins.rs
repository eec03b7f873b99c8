use poise::builtins::HelpConfiguration;

use crate::{Context, Error, poise_instrument, record_ctx_fields};

const HELP_FOOTER: &str = "\
Start a round with /wordle and type your guesses straight into the channel.
Use /wordle-board to see your progress so far.";

poise_instrument! {
    /// Registers/unregisters commands for this guild or all guilds.
    #[poise::command(
        slash_command,
        prefix_command,
        aliases("refresh"),
        owners_only,
        hide_in_help
    )]
    pub async fn register(ctx: Context<'_>) -> Result<(), Error> {
        record_ctx_fields!(ctx);
        poise::builtins::register_application_commands_buttons(ctx).await?;
        Ok(())
    }

    /// Lists the available commands, or shows details for one of them.
    #[poise::command(
        slash_command,
        prefix_command,
        track_edits,
        track_deletion,
        hide_in_help
    )]
    pub async fn help(
        ctx: Context<'_>,
        #[description = "Command to show help for"] command: Option<String>,
    ) -> Result<(), Error> {
        record_ctx_fields!(ctx);
        let config = HelpConfiguration {
            extra_text_at_bottom: HELP_FOOTER,
            ephemeral: true,
            ..Default::default()
        };
        poise::builtins::help(ctx, command.as_deref(), config).await?;
        Ok(())
    }
}
