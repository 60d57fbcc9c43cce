//! Record extraction from pet advertisement embeds
//!
//! Each embed description is scanned twice:
//! 1. line by line against an ordered table of emoji prefixes, and
//! 2. as a whole against the session-locator patterns (quick-join variant)
//!    or for join-script markers (job-script variant).
//!
//! Order matters throughout: a later match overwrites an earlier one for
//! the same field. Nothing here fails; a missing line or pattern leaves the
//! field unset.

use std::sync::LazyLock;

use regex::Regex;
use types::embed::Embed;
use types::record::PetRecord;
use types::variant::ParserVariant;

/// Static page that launches a game session from a place id and job id.
pub const QUICK_JOIN_URL_BASE: &str = "https://obritadavilindo-tech.github.io/Krxreimyquickjoin/";

const MOBILE_JOB_MARKER: &str = "📱 Mobile Job";
const PC_JOB_MARKER: &str = "💻 PC Job";
const CODE_FENCE: &str = "```";

static PLACE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Place ID:\s*([0-9]+)").expect("valid place id regex")
});

static JOB_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Job ID:\s*([a-zA-Z0-9-]+)").expect("valid job id regex")
});

static QUICK_JOIN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)placeId=([0-9]+)&gameInstanceId=([a-zA-Z0-9-]+)")
        .expect("valid quick join regex")
});

static TELEPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"TeleportToPlaceInstance\(([0-9]+), '([a-zA-Z0-9-]+)'")
        .expect("valid teleport regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PrefixField {
    Name,
    ValuePerSecond,
    PlayerCount,
    Region,
    Mutation,
    Traits,
}

impl PrefixField {
    fn slot<'a>(&self, record: &'a mut PetRecord) -> &'a mut Option<String> {
        match self {
            PrefixField::Name => &mut record.name,
            PrefixField::ValuePerSecond => &mut record.value_per_second,
            PrefixField::PlayerCount => &mut record.player_count,
            PrefixField::Region => &mut record.region,
            PrefixField::Mutation => &mut record.mutation,
            PrefixField::Traits => &mut record.traits,
        }
    }
}

/// A line starting with `emoji` assigns the line, minus the first
/// occurrence of `label`, to `field`.
struct PrefixRule {
    emoji: &'static str,
    label: &'static str,
    field: PrefixField,
}

const QUICK_JOIN_RULES: &[PrefixRule] = &[
    PrefixRule { emoji: "🏷️", label: "🏷️ **Name:** ", field: PrefixField::Name },
    PrefixRule { emoji: "💰", label: "💰 **Money per sec:** ", field: PrefixField::ValuePerSecond },
    PrefixRule { emoji: "👥", label: "👥 **Players:** ", field: PrefixField::PlayerCount },
    PrefixRule { emoji: "🧬", label: "🧬 **Mutation:** ", field: PrefixField::Mutation },
    PrefixRule { emoji: "🎭", label: "🎭 **Traits:** ", field: PrefixField::Traits },
];

const JOB_SCRIPT_RULES: &[PrefixRule] = &[
    PrefixRule { emoji: "🏷️", label: "🏷️ **Name:** ", field: PrefixField::Name },
    PrefixRule { emoji: "💰", label: "💰 **Money per sec:** ", field: PrefixField::ValuePerSecond },
    PrefixRule { emoji: "👥", label: "👥 **Players:** ", field: PrefixField::PlayerCount },
    PrefixRule { emoji: "🗺", label: "🗺 **Region:** ", field: PrefixField::Region },
    PrefixRule { emoji: "🧬", label: "🧬 **Mutation:** ", field: PrefixField::Mutation },
    PrefixRule { emoji: "🎭", label: "🎭 **Traits:** ", field: PrefixField::Traits },
];

/// Turns embeds into [`PetRecord`]s for one parser variant.
#[derive(Debug, Clone, Copy)]
pub struct Extractor {
    variant: ParserVariant,
}

impl Extractor {
    pub fn new(variant: ParserVariant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> ParserVariant {
        self.variant
    }

    /// Extract one record per embed, all stamped with the same `now`.
    pub fn extract_batch(&self, embeds: &[Embed], now: i64) -> Vec<PetRecord> {
        embeds.iter().map(|embed| self.extract(embed, now)).collect()
    }

    pub fn extract(&self, embed: &Embed, now: i64) -> PetRecord {
        let mut record = PetRecord::new(now);
        let description = embed.description.as_deref().unwrap_or("");
        let lines: Vec<&str> = description.split('\n').collect();

        match self.variant {
            ParserVariant::QuickJoin => {
                apply_prefix_rules(QUICK_JOIN_RULES, &lines, &mut record);
                apply_session_patterns(description, &mut record);
            }
            ParserVariant::JobScript => {
                apply_prefix_rules(JOB_SCRIPT_RULES, &lines, &mut record);
                apply_join_scripts(&lines, &mut record);
            }
        }

        record.title = embed.title.clone().unwrap_or_default();
        record.color = embed.color.unwrap_or(0);
        record.thumbnail_url = embed.thumbnail_url().unwrap_or_default().to_string();
        record.footer_text = embed.footer_text().unwrap_or_default().to_string();

        record
    }
}

fn apply_prefix_rules(rules: &[PrefixRule], lines: &[&str], record: &mut PetRecord) {
    for line in lines {
        for rule in rules {
            if line.starts_with(rule.emoji) {
                *rule.field.slot(record) = Some(line.replacen(rule.label, "", 1));
            }
        }
    }
}

/// Evaluated in fixed order; each matching pattern overwrites the ids set
/// by the ones before it.
fn apply_session_patterns(description: &str, record: &mut PetRecord) {
    if let Some(caps) = PLACE_ID_RE.captures(description) {
        record.place_id = Some(caps[1].to_string());
    }

    if let Some(caps) = JOB_ID_RE.captures(description) {
        record.job_id = Some(caps[1].to_string());
    }

    if let Some(caps) = QUICK_JOIN_RE.captures(description) {
        let place_id = caps[1].to_string();
        let job_id = caps[2].to_string();
        record.quick_join_url = Some(quick_join_url(&place_id, &job_id));
        record.place_id = Some(place_id);
        record.job_id = Some(job_id);
    }

    if let Some(caps) = TELEPORT_RE.captures(description) {
        record.place_id = Some(caps[1].to_string());
        record.job_id = Some(caps[2].to_string());
    }
}

/// A marker line captures the line after it.
fn apply_join_scripts(lines: &[&str], record: &mut PetRecord) {
    for (i, line) in lines.iter().enumerate() {
        let Some(next) = lines.get(i + 1) else {
            break;
        };

        if line.starts_with(MOBILE_JOB_MARKER) {
            record.mobile_join_script = Some(next.replace(CODE_FENCE, ""));
        } else if line.starts_with(PC_JOB_MARKER) {
            record.pc_join_script = Some(next.replace(CODE_FENCE, ""));
        }
    }
}

pub fn quick_join_url(place_id: &str, job_id: &str) -> String {
    format!("{QUICK_JOIN_URL_BASE}?placeId={place_id}&gameInstanceId={job_id}")
}
