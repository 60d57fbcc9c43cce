use serde::{Deserialize, Serialize};
use serde_json::Value;
use types::ids::{ChannelId, MessageId};

/// A chat message as delivered by the platform's message endpoint.
///
/// Embeds are kept as raw JSON so they can be forwarded verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    #[serde(default)]
    pub embeds: Vec<Value>,
}

/// Body of `POST /pets` as sent by the relay.
#[derive(Debug, Serialize)]
pub struct IngestRequest<'a> {
    pub embeds: &'a [Value],
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    pub id: String,
    pub username: String,
}
