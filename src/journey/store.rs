use super::loader::{self, LoadError};
use super::models::{
    DecisionWithReasons, EpisodeAnalysis, InternalMetrics, Message, SentimentPoint,
    TAG_DECISION, TAG_MILESTONE, TAG_REASON,
};
use crate::month::{MonthKey, MonthParseError};
use crate::narratives::NarrativeCatalog;
use crate::sentiment;
use indexmap::IndexMap;
use std::path::Path;
use thiserror::Error;

/// Query failures. Display text is the client-facing detail message.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Journey data not loaded.")]
    NotLoaded,
    #[error("No milestone events found.")]
    NoMilestones,
    #[error("Decision with ID {0} not found.")]
    DecisionNotFound(i64),
    #[error("Invalid month format. Use 'Month YYYY'.")]
    InvalidMonth(#[from] MonthParseError),
    #[error("No data found for {0}.")]
    NoDataForMonth(String),
}

impl QueryError {
    /// True when the caller's input was malformed, as opposed to simply
    /// matching nothing
    pub fn is_bad_request(&self) -> bool {
        matches!(self, QueryError::InvalidMonth(_))
    }
}

/// The journey log, loaded once and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Journey {
    messages: Vec<Message>,
}

impl Journey {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Load the log at `path`, degrading to an empty journey on any failure.
    pub fn load_or_empty(path: &Path) -> Self {
        match loader::load_messages(path) {
            Ok(messages) => {
                tracing::info!(path = %path.display(), count = messages.len(), "journey data loaded");
                Self::new(messages)
            }
            Err(LoadError::NotFound(p)) => {
                tracing::error!(path = %p.display(), "journey data file not found, serving empty dataset");
                Self::default()
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to load journey data, serving empty dataset");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Every message in file order. An empty log counts as not loaded.
    pub fn all_messages(&self) -> Result<&[Message], QueryError> {
        if self.messages.is_empty() {
            return Err(QueryError::NotLoaded);
        }
        Ok(&self.messages)
    }

    pub fn timeline(&self) -> Result<Vec<&Message>, QueryError> {
        let milestones: Vec<&Message> = self.messages.iter()
            .filter(|m| m.is_tagged(TAG_MILESTONE))
            .collect();
        if milestones.is_empty() {
            return Err(QueryError::NoMilestones);
        }
        Ok(milestones)
    }

    /// The decision with `id` and every reason linked back to it.
    ///
    /// A decision with no reasons is a success with an empty list.
    pub fn decision_with_reasons(&self, id: i64) -> Result<DecisionWithReasons<'_>, QueryError> {
        let decision = self.messages.iter()
            .find(|m| m.id == id && m.is_tagged(TAG_DECISION))
            .ok_or(QueryError::DecisionNotFound(id))?;

        let reasons = self.messages.iter()
            .filter(|m| m.is_tagged(TAG_REASON) && m.tags.linked_id == Some(id))
            .collect();

        Ok(DecisionWithReasons { decision, reasons })
    }

    /// Message counts per team role; member and assistant traffic excluded.
    pub fn internal_metrics(&self) -> Result<InternalMetrics, QueryError> {
        if self.messages.is_empty() {
            return Err(QueryError::NotLoaded);
        }

        let mut by_role: IndexMap<String, usize> = IndexMap::new();
        for msg in self.messages.iter().filter(|m| m.is_team_role()) {
            *by_role.entry(msg.role.clone()).or_insert(0) += 1;
        }

        Ok(InternalMetrics {
            total_elyx_team_interactions: by_role.values().sum(),
            interactions_by_role: by_role,
        })
    }

    pub fn messages_in_month(&self, month: MonthKey) -> Vec<&Message> {
        self.messages.iter()
            .filter(|m| month.contains(&m.timestamp.local()))
            .collect()
    }

    /// Narrative for `month_name` ("Month YYYY"), provided the month has
    /// at least one message.
    pub fn episode(&self, month_name: &str, catalog: &NarrativeCatalog) -> Result<EpisodeAnalysis, QueryError> {
        let month: MonthKey = month_name.parse()?;
        if self.messages_in_month(month).is_empty() {
            return Err(QueryError::NoDataForMonth(month_name.to_string()));
        }
        Ok(catalog.episode(month_name))
    }

    pub fn sentiment_trend(&self) -> Vec<SentimentPoint> {
        sentiment::monthly_trend(&self.messages)
    }
}
