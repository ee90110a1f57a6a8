//! Reward schemes for session scoring.
//!
//! XP is awarded per answered card. Two schemes exist: a difficulty-scaled
//! table with partial credit for wrong answers, and a flat rate used for
//! backend-persisted decks.

use crate::types::Difficulty;

/// Trait for XP reward schemes.
pub trait RewardScheme: Send + Sync {
    /// Scheme identifier.
    fn name(&self) -> &'static str;

    /// XP earned for answering a card.
    fn reward(&self, difficulty: Difficulty, correct: bool) -> u32;
}

/// Difficulty-scaled rewards: easy=10, medium=20, hard=30, with 30%
/// partial credit (floored) for an incorrect attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct DifficultyScaled;

impl RewardScheme for DifficultyScaled {
    fn name(&self) -> &'static str {
        "difficulty_scaled"
    }

    fn reward(&self, difficulty: Difficulty, correct: bool) -> u32 {
        let base = match difficulty {
            Difficulty::Easy => 10,
            Difficulty::Medium => 20,
            Difficulty::Hard => 30,
        };
        if correct {
            base
        } else {
            (base as f64 * 0.3).floor() as u32
        }
    }
}

/// Flat rewards independent of difficulty: 20 correct, 5 incorrect.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatRate;

impl RewardScheme for FlatRate {
    fn name(&self) -> &'static str {
        "flat_rate"
    }

    fn reward(&self, _difficulty: Difficulty, correct: bool) -> u32 {
        if correct {
            20
        } else {
            5
        }
    }
}

/// Get reward scheme by name.
pub fn get_scheme(name: &str) -> Option<Box<dyn RewardScheme>> {
    match name {
        "difficulty_scaled" => Some(Box::new(DifficultyScaled)),
        "flat_rate" => Some(Box::new(FlatRate)),
        _ => None,
    }
}

/// Level reached at a given XP total: `xp / 100 + 1`.
pub fn level_from_xp(xp: u32) -> u32 {
    xp / 100 + 1
}
