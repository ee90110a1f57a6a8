//! Core types for the study client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Card difficulty as assigned by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Get the difficulty as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// A single study card. Immutable once loaded into a session.
///
/// `id` is present only for backend-persisted cards; demo and freshly
/// generated decks carry no ids and never report progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub front: String,
    pub back: String,
    pub category: String,
    pub difficulty: Difficulty,
}

/// Accumulated stats for one session.
///
/// `level` is derived from `xp` on every change and is never set
/// independently. `max_streak` is monotone non-decreasing within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub correct: u32,
    pub incorrect: u32,
    pub streak: u32,
    pub max_streak: u32,
    pub xp: u32,
    pub level: u32,
}

impl Default for SessionStats {
    fn default() -> Self {
        Self {
            correct: 0,
            incorrect: 0,
            streak: 0,
            max_streak: 0,
            xp: 0,
            level: 1,
        }
    }
}

impl SessionStats {
    /// Fold one answer into the stats.
    pub fn record(&mut self, correct: bool, xp_gained: u32) {
        if correct {
            self.correct += 1;
            self.streak += 1;
            self.max_streak = self.max_streak.max(self.streak);
        } else {
            self.incorrect += 1;
            self.streak = 0;
        }
        self.xp += xp_gained;
        self.level = crate::scoring::level_from_xp(self.xp);
    }

    /// Rounded percentage of correct answers, 0 before any answer.
    pub fn accuracy(&self) -> u32 {
        let answered = self.correct + self.incorrect;
        if answered == 0 {
            return 0;
        }
        ((self.correct as f64 / answered as f64) * 100.0).round() as u32
    }
}

/// Outcome recorded for one card position.
///
/// `attempts` accumulates across re-answers of the same position while
/// `correct` and `difficulty` reflect the latest answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardResult {
    pub correct: bool,
    pub attempts: u32,
    pub difficulty: Difficulty,
}

/// Externally consumable snapshot of a session, suitable for download.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub session_stats: SessionStats,
    pub card_results: HashMap<usize, CardResult>,
    pub prompt: String,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn difficulty_round_trips_through_strings() {
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("expert"), None);
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        let json = serde_json::to_string(&Difficulty::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }

    #[test]
    fn flashcard_accepts_missing_id() {
        let card: Flashcard = serde_json::from_str(
            r#"{"front":"Hello","back":"Bonjour","category":"Greetings","difficulty":"easy"}"#,
        )
        .unwrap();
        assert_eq!(card.id, None);
        assert_eq!(card.difficulty, Difficulty::Easy);
    }

    #[test]
    fn report_serializes_with_document_keys() {
        let report = SessionReport {
            session_stats: SessionStats::default(),
            card_results: HashMap::new(),
            prompt: "French basics".to_string(),
            timestamp: chrono::Utc::now(),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("sessionStats").is_some());
        assert!(value.get("cardResults").is_some());
        assert!(value.get("timestamp").is_some());
    }

    #[test]
    fn accuracy_rounds_to_whole_percent() {
        let mut stats = SessionStats::default();
        assert_eq!(stats.accuracy(), 0);
        stats.record(true, 10);
        stats.record(true, 10);
        stats.record(false, 3);
        assert_eq!(stats.accuracy(), 67);
    }
}
