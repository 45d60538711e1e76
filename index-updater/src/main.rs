use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use index_updater::{AppConfig, Dependencies, IndexerError, LogFormat};

#[tokio::main]
async fn main() -> Result<(), IndexerError> {
    dotenv::dotenv().ok();

    let config = AppConfig::from_env()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }

    let deps = Dependencies::new(&config).await.map_err(|e| {
        error!(error = %e, "Failed to initialize dependencies");
        e
    })?;

    let feed = deps.feed;
    let run = feed.run(BufReader::new(tokio::io::stdin()));
    tokio::pin!(run);

    let summary = tokio::select! {
        summary = &mut run => summary?,
        () = shutdown_signal() => {
            feed.shutdown();
            run.await?
        }
    };

    info!(
        failed = summary.failed,
        malformed = summary.malformed,
        "Index updater stopped"
    );
    Ok(())
}

/// Resolves on ctrl-c. If the handler cannot be installed the feed keeps
/// running until its input ends.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
