mod clock;
mod config;
mod error;
mod extractor;
mod handlers;
mod models;
mod relay;
mod render;
mod router;
mod state;
mod store;

use config::Config;
use relay::feed::DiscordFeed;
use relay::Relay;
use relay::forwarder::{Forwarder, HttpIngestClient};
use router::create_router;
use state::AppState;
use std::future::IntoFuture;
use std::net::SocketAddr;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Missing token or channel list stops the process before it serves.
    let config = Config::from_env()?;

    tracing::info!(
        port = config.port,
        variant = %config.parser_variant,
        channels = config.channel_ids.len(),
        "Starting pet feed gateway"
    );

    let http_client = reqwest::Client::new();
    let feed = DiscordFeed::new(
        http_client.clone(),
        config.discord_api_base.clone(),
        config.discord_token.clone(),
        config.channel_ids.iter().cloned(),
    );
    let forwarder = Forwarder::new(
        HttpIngestClient::new(http_client, config.ingest_url()),
        config.channel_ids.clone(),
    );
    let mut relay = Relay::new(feed, forwarder);

    // A rejected token is fatal; anything else is retried on every poll.
    if let Err(e) = relay.connect().await {
        if e.is_auth_failure() {
            return Err(anyhow::Error::new(e).context("Chat login rejected"));
        }
        tracing::warn!(error = %e, "Chat login failed, retrying every poll");
    }

    let state = AppState::new(config.parser_variant);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;

    let relay_task = tokio::spawn(relay.run(config.poll_interval));

    tracing::info!("Server running at http://localhost:{}", config.port);
    tokio::select! {
        served = axum::serve(listener, app).into_future() => served?,
        stopped = relay_task => {
            let e = stopped?;
            return Err(anyhow::Error::new(e).context("Chat relay stopped"));
        }
    }

    Ok(())
}
