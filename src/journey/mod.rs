mod loader;
mod models;
mod store;

pub use loader::{load_messages, parse_messages, LoadError};
pub use models::{
    DecisionWithReasons, EpisodeAnalysis, EpisodeNarrative, InternalMetrics, Message,
    PersonaState, SentimentPoint, Tag, Timestamp, TimestampParseError, WeeklyReport,
    NON_TEAM_ROLES, ROLE_MEMBER, ROLE_PERSONAL_ASSISTANT, TAG_DECISION, TAG_MILESTONE, TAG_REASON,
};
pub use store::{Journey, QueryError};
