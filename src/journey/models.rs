use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const TAG_MILESTONE: &str = "milestone";
pub const TAG_DECISION: &str = "decision";
pub const TAG_REASON: &str = "reason";

pub const ROLE_MEMBER: &str = "Member";
pub const ROLE_PERSONAL_ASSISTANT: &str = "Personal Assistant";

/// Roles that are not counted as Elyx team interactions
pub const NON_TEAM_ROLES: [&str; 2] = [ROLE_MEMBER, ROLE_PERSONAL_ASSISTANT];

// Message timestamps arrive either as naive wall-clock values or with an
// offset. The wall clock as written decides which month a message belongs to.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Naive(NaiveDateTime),
    Offset(DateTime<FixedOffset>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp '{0}'")]
pub struct TimestampParseError(String);

impl Timestamp {
    /// Wall-clock time as written in the source, offset ignored
    pub fn local(&self) -> NaiveDateTime {
        match self {
            Timestamp::Naive(dt) => *dt,
            Timestamp::Offset(dt) => dt.naive_local(),
        }
    }
}

impl FromStr for Timestamp {
    type Err = TimestampParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Timestamp::Offset(dt));
        }
        if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f%:z") {
            return Ok(Timestamp::Offset(dt));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Timestamp::Naive(dt));
            }
        }
        // Bare dates mean midnight
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(Timestamp::Naive)
            .ok_or_else(|| TimestampParseError(s.to_string()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Naive(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.f")),
            Timestamp::Offset(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,      // "milestone" | "decision" | "reason" | NULL
    #[serde(default)]
    pub linked_id: Option<i64>,    // Decision a "reason" message justifies
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub id: i64,
    pub timestamp: Timestamp,
    pub sender: String,
    pub role: String,              // Free text, e.g. "Member", "Doctor", "Coach"
    pub content: String,
    pub tags: Tag,
}

impl Message {
    pub fn tag_kind(&self) -> Option<&str> {
        self.tags.kind.as_deref()
    }

    pub fn is_tagged(&self, kind: &str) -> bool {
        self.tag_kind() == Some(kind)
    }

    pub fn is_team_role(&self) -> bool {
        !NON_TEAM_ROLES.contains(&self.role.as_str())
    }
}

// ============================================================================
// Derived views, computed per request
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct DecisionWithReasons<'a> {
    pub decision: &'a Message,
    pub reasons: Vec<&'a Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InternalMetrics {
    pub total_elyx_team_interactions: usize,
    pub interactions_by_role: IndexMap<String, usize>,  // First-seen role order
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonaState {
    pub before: String,
    pub after: String,
}

/// Hand-authored narrative for one month, as stored in the narrative catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EpisodeNarrative {
    pub primary_goal_trigger: String,
    pub friction_points: Vec<String>,
    pub final_outcome: String,
    pub persona_analysis: PersonaState,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EpisodeAnalysis {
    pub month_name: String,
    #[serde(flatten)]
    pub narrative: EpisodeNarrative,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentimentPoint {
    pub month: String,             // "February 2025"
    pub average_score: f64,        // Mean of -1/0/+1 scores, 2 decimals
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyReport {
    pub week_of: String,
    pub summary: String,           // Pre-rendered HTML
}
