//! Tracing helpers for poise commands.

/// Wraps one or more poise command functions in a `tracing` span named after the
/// command. The span declares `guild_id`, `channel_id` and `author` as empty
/// fields for [`record_ctx_fields!`] to fill in.
#[macro_export]
macro_rules! poise_instrument {
    ($(
        $(#[$meta:meta])*
        $vis:vis async fn $name:ident ( $($args:tt)* ) -> $ret:ty $body:block
    )*) => {
        $(
            $(#[$meta])*
            #[tracing::instrument(
                level = "debug",
                skip_all,
                fields(
                    command = stringify!($name),
                    guild_id = tracing::field::Empty,
                    channel_id = tracing::field::Empty,
                    author = tracing::field::Empty,
                )
            )]
            $vis async fn $name ( $($args)* ) -> $ret $body
        )*
    };
}

/// Records the invoking guild, channel and author on the current span.
#[macro_export]
macro_rules! record_ctx_fields {
    ($ctx:expr) => {{
        let span = tracing::Span::current();
        if let Some(guild_id) = $ctx.guild_id() {
            span.record("guild_id", guild_id.get());
        }
        span.record("channel_id", $ctx.channel_id().get());
        span.record("author", $ctx.author().name.as_str());
    }};
}
