//! Pet advertisement record
//!
//! One record is produced per embed at ingestion time. Records are
//! immutable once built; the store only appends and prunes them.

use serde::Serialize;

/// Fielded data extracted from a single pet advertisement embed.
///
/// `received_at` is always present. Every optional field is best-effort:
/// `None` means the source carried no matching line or pattern, which
/// readers must treat as "unknown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PetRecord {
    /// Ingestion time (Unix millis). Drives ordering and expiry.
    pub received_at: i64,

    // Passthrough fields, copied verbatim from the embed
    pub title: String,
    pub color: u32,
    pub thumbnail_url: String,
    pub footer_text: String,

    // Prefix-line fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_per_second: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traits: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    // Session locators
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_join_url: Option<String>,

    // Join scripts captured from the line after a marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_join_script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pc_join_script: Option<String>,
}

impl PetRecord {
    /// Create an empty record stamped with the ingestion time.
    pub fn new(received_at: i64) -> Self {
        Self {
            received_at,
            ..Self::default()
        }
    }

    /// Age of the record relative to `now`, in millis.
    pub fn age_ms(&self, now: i64) -> i64 {
        now - self.received_at
    }
}
