//! Hand-authored episode narratives and the weekly report.
//!
//! The catalog is plain data: a bundled JSON document compiled into the
//! binary, optionally replaced by an operator-supplied file at startup.

use crate::journey::{EpisodeAnalysis, EpisodeNarrative, WeeklyReport};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BUILTIN_NARRATIVES: &str = include_str!("../data/narratives.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read narratives file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid narratives document: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct NarrativeCatalog {
    episodes: HashMap<String, EpisodeNarrative>,
    fallback: EpisodeNarrative,
    weekly_report: WeeklyReport,
}

impl NarrativeCatalog {
    /// The catalog shipped with the server
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_NARRATIVES)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)
            .map_err(|source| CatalogError::Io { path: path.to_path_buf(), source })?;
        Self::from_json(&content)
    }

    /// Whether `month_name` has its own narrative (exact string match)
    pub fn has_episode(&self, month_name: &str) -> bool {
        self.episodes.contains_key(month_name)
    }

    /// Narrative for `month_name`, or the generic fallback.
    ///
    /// Never looks at the month's messages: the text is fixed per month.
    pub fn episode(&self, month_name: &str) -> EpisodeAnalysis {
        let narrative = self.episodes.get(month_name).unwrap_or(&self.fallback);
        EpisodeAnalysis {
            month_name: month_name.to_string(),
            narrative: narrative.clone(),
        }
    }

    pub fn weekly_report(&self) -> &WeeklyReport {
        &self.weekly_report
    }
}
