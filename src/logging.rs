use std::path::PathBuf;

use jurassicbot::infrastructure::environment::{self, get_log_directory, parse_env_var};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn,jurassicbot=info";
const LOG_FILE_PREFIX: &str = "jurassicbot.log";

/// Loads `.env`, installs the global subscriber and returns the guard that keeps
/// the file writer flushing. Hold it until the process exits.
pub fn init_logger() -> WorkerGuard {
    let env_file = load_env_file();
    let guard = init_tracing();
    info!("Starting Jurassicbot...");
    log_env_file_result(env_file);
    guard
}

fn get_log_path_var() -> bool {
    match parse_env_var::<bool>(environment::LOG_PATH) {
        Ok(value) => value.unwrap_or(false),
        Err(e) => {
            eprintln!("{:?}", e);
            false
        }
    }
}

fn use_ansi() -> bool {
    match std::env::var(environment::LOG_STYLE).as_deref() {
        Ok("never") => false,
        Ok("always") => true,
        _ => std::io::IsTerminal::is_terminal(&std::io::stdout()),
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(environment::LOG_LEVEL)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn init_tracing() -> WorkerGuard {
    let log_path = get_log_path_var();
    let file_appender = tracing_appender::rolling::daily(get_log_directory(), LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let stdout_layer = fmt::layer()
        .with_ansi(use_ansi())
        .with_file(log_path)
        .with_line_number(log_path);
    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_file(log_path)
        .with_line_number(log_path)
        .with_writer(file_writer);

    let result = tracing_subscriber::registry()
        .with(env_filter())
        .with(stdout_layer)
        .with(file_layer)
        .try_init();
    if let Err(e) = result {
        warn!("Global tracing subscriber was already set: {}", e);
    }
    guard
}

fn load_env_file() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

fn log_env_file_result(env_file: Option<PathBuf>) {
    if let Some(path) = env_file {
        info!("Loaded environment variables from {}", path.display());
    } else {
        info!("No .env file found, proceeding with system environment variables.");
    }
}
