//! Rich embed view
//!
//! Embeds arrive as arbitrary JSON forwarded verbatim from the chat
//! platform. Construction is lenient: a field that is missing or carries
//! the wrong JSON type is treated as absent, so building an [`Embed`]
//! never fails.

use serde_json::Value;

/// The subset of an embed that the pet extractor reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub color: Option<u32>,
    pub thumbnail: Option<EmbedThumbnail>,
    pub footer: Option<EmbedFooter>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedThumbnail {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmbedFooter {
    pub text: Option<String>,
}

impl Embed {
    /// Build an embed from an untyped JSON value.
    ///
    /// Non-object values yield an empty embed.
    pub fn from_json(value: &Value) -> Self {
        Self {
            title: string_field(value, "title"),
            description: string_field(value, "description"),
            color: value
                .get("color")
                .and_then(Value::as_u64)
                .and_then(|c| u32::try_from(c).ok()),
            thumbnail: value.get("thumbnail").filter(|v| v.is_object()).map(|t| {
                EmbedThumbnail {
                    url: string_field(t, "url"),
                }
            }),
            footer: value.get("footer").filter(|v| v.is_object()).map(|f| EmbedFooter {
                text: string_field(f, "text"),
            }),
        }
    }

    pub fn thumbnail_url(&self) -> Option<&str> {
        self.thumbnail.as_ref().and_then(|t| t.url.as_deref())
    }

    pub fn footer_text(&self) -> Option<&str> {
        self.footer.as_ref().and_then(|f| f.text.as_deref())
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}
