//! Keyword sentiment over member messages.
//!
//! Each member message scores +1, -1 or 0 by substring match on its
//! lower-cased content. Positive keywords win when both lists match.

use crate::journey::{Message, SentimentPoint, ROLE_MEMBER};
use crate::month::MonthKey;
use std::collections::BTreeMap;

pub const POSITIVE_KEYWORDS: [&str; 6] = ["good", "excellent", "better", "powerful", "great", "successful"];
pub const NEGATIVE_KEYWORDS: [&str; 7] = ["issue", "problem", "anxious", "frustration", "setback", "wrong", "not heard"];

pub fn score(content: &str) -> i8 {
    let content = content.to_lowercase();
    if POSITIVE_KEYWORDS.iter().any(|k| content.contains(k)) {
        1
    } else if NEGATIVE_KEYWORDS.iter().any(|k| content.contains(k)) {
        -1
    } else {
        0
    }
}

/// Average member sentiment per calendar month, oldest month first.
pub fn monthly_trend<'a, I>(messages: I) -> Vec<SentimentPoint>
where
    I: IntoIterator<Item = &'a Message>,
{
    let mut months: BTreeMap<MonthKey, (i64, u32)> = BTreeMap::new();

    for msg in messages.into_iter().filter(|m| m.role == ROLE_MEMBER) {
        let entry = months.entry(MonthKey::of(&msg.timestamp.local())).or_default();
        entry.0 += i64::from(score(&msg.content));
        entry.1 += 1;
    }

    months
        .into_iter()
        .map(|(key, (sum, count))| SentimentPoint {
            month: key.to_string(),
            average_score: round2(sum as f64 / f64::from(count)),
        })
        .collect()
}

/// Two decimal places, exact halves to the even neighbour (0.125 -> 0.12).
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journey::Tag;

    fn msg(id: i64, timestamp: &str, role: &str, content: &str) -> Message {
        Message {
            id,
            timestamp: timestamp.parse().unwrap(),
            sender: "someone".to_string(),
            role: role.to_string(),
            content: content.to_string(),
            tags: Tag::default(),
        }
    }

    #[test]
    fn test_positive_takes_precedence() {
        assert_eq!(score("Great session, but one problem with the strap"), 1);
    }

    #[test]
    fn test_negative_and_neutral() {
        assert_eq!(score("I feel ANXIOUS about the board meeting"), -1);
        assert_eq!(score("I feel like I'm not heard"), -1);
        assert_eq!(score("Flight lands at 6pm."), 0);
    }

    #[test]
    fn test_substring_match() {
        // "goodness" contains "good"; matching is on substrings, not words
        assert_eq!(score("My goodness"), 1);
    }

    #[test]
    fn test_trend_only_counts_members() {
        let messages = vec![
            msg(1, "2025-02-01T09:00:00", "Member", "great"),
            msg(2, "2025-02-02T09:00:00", "Coach", "problem"),
            msg(3, "2025-02-03T09:00:00", "Personal Assistant", "wrong"),
        ];
        let trend = monthly_trend(&messages);
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].month, "February 2025");
        assert_eq!(trend[0].average_score, 1.0);
    }

    #[test]
    fn test_trend_averages_and_rounds() {
        let messages = vec![
            msg(1, "2025-03-01T09:00:00", "Member", "great"),
            msg(2, "2025-03-02T09:00:00", "Member", "neutral"),
            msg(3, "2025-03-03T09:00:00", "Member", "neutral"),
        ];
        let trend = monthly_trend(&messages);
        assert_eq!(trend[0].average_score, 0.33);

        let messages = vec![
            msg(1, "2025-03-01T09:00:00", "Member", "setback"),
            msg(2, "2025-03-02T09:00:00", "Member", "issue"),
            msg(3, "2025-03-03T09:00:00", "Member", "good"),
        ];
        assert_eq!(monthly_trend(&messages)[0].average_score, -0.33);
    }

    #[test]
    fn test_trend_rounds_halves_to_even() {
        // 1/8 = 0.125 exactly
        let mut messages = vec![msg(1, "2025-06-01T09:00:00", "Member", "great")];
        for id in 2..=8 {
            messages.push(msg(id, "2025-06-02T09:00:00", "Member", "checking in"));
        }
        assert_eq!(monthly_trend(&messages)[0].average_score, 0.12);

        // 3/8 = 0.375 exactly
        for m in messages.iter_mut().take(3) {
            m.content = "good".to_string();
        }
        assert_eq!(monthly_trend(&messages)[0].average_score, 0.38);

        for m in messages.iter_mut() {
            m.content = "checking in".to_string();
        }
        messages[0].content = "problem".to_string();
        assert_eq!(monthly_trend(&messages)[0].average_score, -0.12);
    }

    #[test]
    fn test_trend_is_chronological() {
        let messages = vec![
            msg(1, "2025-08-01T09:00:00", "Member", "good"),
            msg(2, "2025-02-01T09:00:00", "Member", "problem"),
            msg(3, "2024-12-01T09:00:00", "Member", "ok"),
            msg(4, "2025-04-01T09:00:00", "Member", "ok"),
        ];
        let months: Vec<String> = monthly_trend(&messages).into_iter().map(|p| p.month).collect();
        assert_eq!(months, ["December 2024", "February 2025", "April 2025", "August 2025"]);
    }

    #[test]
    fn test_trend_empty_without_members() {
        assert!(monthly_trend(&Vec::<Message>::new()).is_empty());
    }
}
