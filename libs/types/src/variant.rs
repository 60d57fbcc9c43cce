//! Parser variant selection
//!
//! Two notifier formats exist in the wild. They disagree on which fields
//! are present and on how a missing field is displayed, so the deployment
//! picks one explicitly instead of merging them.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ParserVariant {
    /// Name/value/players/mutation/traits plus place id, job id and the
    /// derived quick-join link. Missing fields display as "N/A".
    #[default]
    QuickJoin,
    /// Name/value/players/region/mutation/traits plus the mobile and PC
    /// join scripts. Missing fields display as empty.
    JobScript,
}

impl ParserVariant {
    /// Text shown in place of a field the record does not carry.
    pub fn missing_placeholder(&self) -> &'static str {
        match self {
            ParserVariant::QuickJoin => "N/A",
            ParserVariant::JobScript => "",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParserVariant::QuickJoin => "quick-join",
            ParserVariant::JobScript => "job-script",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown parser variant: {0} (expected quick-join or job-script)")]
pub struct UnknownVariant(pub String);

impl FromStr for ParserVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quick-join" | "quickjoin" => Ok(ParserVariant::QuickJoin),
            "job-script" | "jobscript" => Ok(ParserVariant::JobScript),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for ParserVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
