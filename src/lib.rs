//! Elyx member journey API.
//!
//! Serves a fixed, chronological log of messages between a member and the
//! Elyx coaching team, plus a few derived views: milestone timeline,
//! decision/reason links, team interaction counts, monthly episode
//! narratives, monthly member sentiment and a weekly report.

pub mod api;
pub mod config;
pub mod journey;
pub mod month;
pub mod narratives;
pub mod sentiment;
