//! Chat relay
//!
//! Polls the upstream message feed and forwards every new message carrying
//! embeds to the local ingestion endpoint. Forwarding is fire-and-forget:
//! no timeout, no cancellation and no retry.

pub mod feed;
pub mod forwarder;

use crate::error::RelayError;
use feed::MessageFeed;
use forwarder::{ForwardOutcome, Forwarder, IngestClient};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, warn};

/// Poll the feed once and forward what it returns.
///
/// Returns how many messages were forwarded.
pub async fn relay_once<F, C>(feed: &mut F, forwarder: &Forwarder<C>) -> usize
where
    F: MessageFeed,
    C: IngestClient,
{
    let messages = match feed.next_batch().await {
        Ok(messages) => messages,
        Err(e) => {
            warn!(error = %e, "Message feed poll failed");
            return 0;
        }
    };

    let mut forwarded = 0;
    for message in &messages {
        if forwarder.process(message).await == ForwardOutcome::Forwarded {
            forwarded += 1;
        }
    }

    if !messages.is_empty() {
        debug!(observed = messages.len(), forwarded, "Relay round complete");
    }
    forwarded
}

/// Drives a feed and a forwarder on a fixed poll interval.
///
/// Polling starts only once the feed has logged in. A login rejected for
/// bad credentials stops the relay; any other login failure is retried on
/// the next tick.
pub struct Relay<F, C> {
    feed: F,
    forwarder: Forwarder<C>,
    connected: bool,
}

impl<F, C> Relay<F, C>
where
    F: MessageFeed,
    C: IngestClient,
{
    pub fn new(feed: F, forwarder: Forwarder<C>) -> Self {
        Self {
            feed,
            forwarder,
            connected: false,
        }
    }

    pub async fn connect(&mut self) -> Result<(), RelayError> {
        self.feed.connect().await?;
        self.connected = true;
        Ok(())
    }

    /// One poll interval of work. Errors only when the login is rejected.
    pub async fn tick(&mut self) -> Result<usize, RelayError> {
        if !self.connected {
            match self.connect().await {
                Ok(()) => {}
                Err(e) if e.is_auth_failure() => return Err(e),
                Err(e) => {
                    warn!(error = %e, "Chat login failed, retrying next poll");
                    return Ok(0);
                }
            }
        }
        Ok(relay_once(&mut self.feed, &self.forwarder).await)
    }

    /// Tick forever. Returns only the error that stopped the relay.
    pub async fn run(mut self, poll_interval: Duration) -> RelayError {
        let mut ticker = interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = self.tick().await {
                return e;
            }
        }
    }

    #[cfg(test)]
    pub fn forwarder(&self) -> &Forwarder<C> {
        &self.forwarder
    }
}
