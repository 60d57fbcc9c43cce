//! At-most-once forwarding of captured messages to the ingestion endpoint

use crate::error::RelayError;
use crate::models::{InboundMessage, IngestRequest};
use async_trait::async_trait;
use dashmap::DashSet;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, error, info};
use types::ids::{ChannelId, MessageId};

#[async_trait]
pub trait IngestClient: Send + Sync {
    async fn post_embeds(&self, embeds: &[Value]) -> Result<(), RelayError>;
}

/// Posts embeds to `POST /pets` over loopback HTTP.
pub struct HttpIngestClient {
    http_client: Client,
    ingest_url: String,
}

impl HttpIngestClient {
    pub fn new(http_client: Client, ingest_url: String) -> Self {
        Self {
            http_client,
            ingest_url,
        }
    }
}

#[async_trait]
impl IngestClient for HttpIngestClient {
    async fn post_embeds(&self, embeds: &[Value]) -> Result<(), RelayError> {
        let res = self
            .http_client
            .post(&self.ingest_url)
            .json(&IngestRequest { embeds })
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(RelayError::Status {
                status: res.status().as_u16(),
                url: self.ingest_url.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardOutcome {
    Forwarded,
    NoEmbeds,
    ForeignChannel,
    Duplicate,
    Failed,
}

/// Forwards each message with embeds at most once.
///
/// A message id is claimed before the POST and released again if the POST
/// fails, so a failed message is only retried if the platform delivers it
/// again. The sent set is never evicted.
pub struct Forwarder<C> {
    client: C,
    channels: HashSet<ChannelId>,
    sent: DashSet<MessageId>,
}

impl<C: IngestClient> Forwarder<C> {
    pub fn new(client: C, channels: HashSet<ChannelId>) -> Self {
        Self {
            client,
            channels,
            sent: DashSet::new(),
        }
    }

    pub async fn process(&self, message: &InboundMessage) -> ForwardOutcome {
        if message.embeds.is_empty() {
            return ForwardOutcome::NoEmbeds;
        }

        if !self.channels.contains(&message.channel_id) {
            debug!(channel_id = %message.channel_id, "Ignoring message from unconfigured channel");
            return ForwardOutcome::ForeignChannel;
        }

        if !self.sent.insert(message.id.clone()) {
            debug!(message_id = %message.id, "Message already forwarded");
            return ForwardOutcome::Duplicate;
        }

        match self.client.post_embeds(&message.embeds).await {
            Ok(()) => {
                info!(message_id = %message.id, embeds = message.embeds.len(), "Embed forwarded to server");
                ForwardOutcome::Forwarded
            }
            Err(e) => {
                self.sent.remove(&message.id);
                error!(message_id = %message.id, error = %e, "Failed to forward embed");
                ForwardOutcome::Failed
            }
        }
    }

    pub fn sent_count(&self) -> usize {
        self.sent.len()
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Records every POST; fails on demand.
    #[derive(Default)]
    pub struct RecordingClient {
        pub posts: Mutex<Vec<Vec<Value>>>,
        pub failing: AtomicBool,
    }

    impl RecordingClient {
        pub fn post_count(&self) -> usize {
            self.posts.lock().unwrap().len()
        }

        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl IngestClient for RecordingClient {
        async fn post_embeds(&self, embeds: &[Value]) -> Result<(), RelayError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(RelayError::Status {
                    status: 503,
                    url: "http://127.0.0.1:3000/pets".to_string(),
                });
            }
            self.posts.lock().unwrap().push(embeds.to_vec());
            Ok(())
        }
    }
}
