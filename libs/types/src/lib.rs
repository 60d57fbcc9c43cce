//! Types library for the pet feed relay
//!
//! Shared data model used by the ingestion gateway and the upstream relay.
//!
//! # Modules
//! - `ids`: Chat-platform identifiers (MessageId, ChannelId)
//! - `embed`: Lenient view over a rich embed attached to a chat message
//! - `record`: The extracted pet advertisement record
//! - `variant`: Parser variant selection

pub mod ids;
pub mod embed;
pub mod record;
pub mod variant;

