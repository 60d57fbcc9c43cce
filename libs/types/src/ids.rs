//! Identifier types for chat-platform entities
//!
//! Discord identifiers are snowflakes: 64-bit integers transported as
//! decimal strings. The newtypes keep the wire string verbatim and only
//! interpret it when ordering is needed.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Identifier of a single chat message
///
/// Used as the at-most-once key when forwarding messages to ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric snowflake value, if the id is a well-formed snowflake
    pub fn snowflake(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl Ord for MessageId {
    /// Snowflakes sort by creation time. Non-numeric ids sort after
    /// numeric ones, lexically among themselves.
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.snowflake(), other.snowflake()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for MessageId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a chat channel
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_orders_numerically() {
        let older = MessageId::new("999999999999999999");
        let newer = MessageId::new("1000000000000000000");
        // Lexical order would put `newer` first.
        assert!(older < newer);
    }

    #[test]
    fn test_message_id_non_numeric_sorts_last() {
        let numeric = MessageId::new("42");
        let junk = MessageId::new("abc");
        assert!(numeric < junk);
        assert_eq!(junk.snowflake(), None);
    }

    #[test]
    fn test_ids_serialize_transparent() {
        let id = ChannelId::new("1234");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1234\"");

        let parsed: MessageId = serde_json::from_str("\"5678\"").unwrap();
        assert_eq!(parsed.as_str(), "5678");
        assert_eq!(parsed.to_string(), "5678");
    }
}
