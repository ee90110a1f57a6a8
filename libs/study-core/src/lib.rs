//! Core study library shared by the client application.
//!
//! Provides:
//! - Reward scheme implementations (difficulty-scaled, flat-rate)
//! - Session controller (cursor, stats, per-card results, deferred advance)
//! - Shared types (Flashcard, Difficulty, SessionStats, SessionReport)
//! - Built-in demo deck for offline sessions

pub mod demo;
pub mod scoring;
pub mod session;
pub mod types;

pub use demo::demo_deck;
pub use scoring::{get_scheme, level_from_xp, DifficultyScaled, FlatRate, RewardScheme};
pub use session::{AdvanceTicket, AnswerOutcome, Phase, SessionController};
pub use types::{CardResult, Difficulty, Flashcard, SessionReport, SessionStats};
