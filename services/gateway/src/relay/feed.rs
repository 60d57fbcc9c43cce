//! Upstream message source
//!
//! The Discord feed polls the channel message endpoint of every configured
//! channel. The first poll of a channel only records where history ends, so
//! only messages created after startup are relayed.

use crate::error::RelayError;
use crate::models::{BotUser, InboundMessage};
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use std::collections::HashMap;
use tracing::{info, warn};
use types::ids::{ChannelId, MessageId};

/// Messages requested per channel per poll (the endpoint allows up to 100).
const PAGE_LIMIT: usize = 50;

#[async_trait]
pub trait MessageFeed: Send {
    /// Log in to the platform. Called until it succeeds, before polling.
    async fn connect(&mut self) -> Result<(), RelayError> {
        Ok(())
    }

    /// Messages observed since the previous call, oldest first.
    async fn next_batch(&mut self) -> Result<Vec<InboundMessage>, RelayError>;
}

pub struct DiscordFeed {
    http_client: Client,
    api_base: String,
    token: String,
    channels: Vec<ChannelId>,
    /// Absent: channel not polled yet. `Some(None)`: polled, channel empty.
    cursors: HashMap<ChannelId, Option<MessageId>>,
}

impl DiscordFeed {
    pub fn new(
        http_client: Client,
        api_base: String,
        token: String,
        channels: impl IntoIterator<Item = ChannelId>,
    ) -> Self {
        Self {
            http_client,
            api_base,
            token,
            channels: channels.into_iter().collect(),
            cursors: HashMap::new(),
        }
    }

    /// Check the token by fetching the bot's own user.
    pub async fn verify(&self) -> Result<BotUser, RelayError> {
        let url = format!("{}/users/@me", self.api_base);
        let user: BotUser = self.get_json(&url).await?;
        info!(user_id = %user.id, "Bot logged in as {}", user.username);
        Ok(user)
    }

    async fn fetch_channel(
        &self,
        channel: &ChannelId,
        after: Option<&MessageId>,
    ) -> Result<Vec<InboundMessage>, RelayError> {
        let mut url = format!(
            "{}/channels/{}/messages?limit={}",
            self.api_base, channel, PAGE_LIMIT
        );
        if let Some(after) = after {
            url.push_str(&format!("&after={after}"));
        }
        self.get_json(&url).await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, RelayError> {
        let res = self
            .http_client
            .get(url)
            .header("Authorization", format!("Bot {}", self.token))
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(RelayError::Status {
                status: res.status().as_u16(),
                url: url.to_string(),
            });
        }
        Ok(res.json::<T>().await?)
    }
}

#[async_trait]
impl MessageFeed for DiscordFeed {
    async fn connect(&mut self) -> Result<(), RelayError> {
        self.verify().await.map(|_| ())
    }

    async fn next_batch(&mut self) -> Result<Vec<InboundMessage>, RelayError> {
        let results = {
            let this = &*self;
            join_all(this.channels.iter().map(|channel| async move {
                let after = this.cursors.get(channel).cloned().flatten();
                (channel.clone(), this.fetch_channel(channel, after.as_ref()).await)
            }))
            .await
        };

        let mut batch = Vec::new();
        let mut first_error = None;
        let mut any_ok = false;
        for (channel, result) in results {
            match result {
                Ok(messages) => {
                    any_ok = true;
                    batch.extend(absorb(&mut self.cursors, &channel, messages));
                }
                Err(e) => {
                    warn!(channel_id = %channel, error = %e, "Channel poll failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) if !any_ok => Err(e),
            _ => Ok(batch),
        }
    }
}

/// Fold one page of channel messages into the cursor table.
///
/// Returns the messages newer than the channel's cursor, oldest first. The
/// first page seen for a channel only primes the cursor.
fn absorb(
    cursors: &mut HashMap<ChannelId, Option<MessageId>>,
    channel: &ChannelId,
    mut messages: Vec<InboundMessage>,
) -> Vec<InboundMessage> {
    messages.sort_by(|a, b| a.id.cmp(&b.id));
    let newest = messages.last().map(|m| m.id.clone());

    let Some(cursor) = cursors.get_mut(channel) else {
        cursors.insert(channel.clone(), newest);
        return Vec::new();
    };

    if let Some(seen) = cursor.as_ref() {
        messages.retain(|m| m.id > *seen);
    }
    if let Some(newest) = newest {
        if cursor.as_ref().is_none_or(|seen| newest > *seen) {
            *cursor = Some(newest);
        }
    }
    messages
}
