mod client;
mod database;
mod logging;
mod shutdown;

use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = logging::init_logger();

    let result = run().await;
    if let Err(e) = &result {
        error!("{:?}", e);
    }
    result
}

async fn run() -> anyhow::Result<()> {
    let db = database::init_database().await?;
    let mut client = client::create_serenity_client(db).await?;
    let shard_manager = client.shard_manager.clone();

    shutdown::run_until_shutdown(client.start(), || async move {
        shard_manager.shutdown_all().await;
        Ok(())
    })
    .await
}
