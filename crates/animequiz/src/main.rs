use animequiz::prelude::*;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), AnimeQuizError> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        addr = %config.bind_addr(),
        fanout = %config.fanout,
        reveal_delay_secs = config.reveal.initial_delay.as_secs(),
        reveal_cadence_secs = config.reveal.cadence.as_secs(),
        "starting"
    );

    let server = AnimeQuizServer::builder()
        .config(config)
        .mirror(MirrorHandle::spawn(MemoryStore::new()))
        .build()
        .await?;
    server.run().await
}
