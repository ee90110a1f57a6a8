//! Session controller: one bounded run through an ordered deck.
//!
//! The controller owns the cursor, reveal flag, stats and per-card results.
//! It is synchronous and single-owner; callers that interleave it with
//! network calls must not issue `answer`/`load_cards` while a prior call on
//! the same session is still outstanding.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::scoring::{DifficultyScaled, RewardScheme};
use crate::types::{CardResult, Flashcard, SessionReport, SessionStats};

/// Logical phase of a session.
///
/// Loading lives outside the controller: cards arrive fully formed via
/// [`SessionController::load_cards`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Active,
    Complete,
}

/// Token for a deferred cursor advance.
///
/// Issued by [`SessionController::answer`] and redeemed after the display
/// delay via [`SessionController::apply_advance`]. A ticket issued before a
/// reset or deck reload is stale and redeeming it has no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "the cursor only advances when the ticket is redeemed"]
pub struct AdvanceTicket {
    epoch: u64,
}

/// Result of answering the current card.
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub xp_gained: u32,
    /// Backend id of the answered card, when the deck is persisted.
    pub card_id: Option<String>,
    pub advance: AdvanceTicket,
}

/// State machine over one flashcard session.
pub struct SessionController {
    flashcards: Vec<Flashcard>,
    current_card: usize,
    show_answer: bool,
    stats: SessionStats,
    card_results: HashMap<usize, CardResult>,
    scheme: Box<dyn RewardScheme>,
    epoch: u64,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(Box::new(DifficultyScaled))
    }
}

impl SessionController {
    /// Create a controller with an empty deck and the given reward scheme.
    pub fn new(scheme: Box<dyn RewardScheme>) -> Self {
        Self {
            flashcards: Vec::new(),
            current_card: 0,
            show_answer: false,
            stats: SessionStats::default(),
            card_results: HashMap::new(),
            scheme,
            epoch: 0,
        }
    }

    /// Swap the reward scheme. Takes effect for subsequent answers only.
    pub fn set_scheme(&mut self, scheme: Box<dyn RewardScheme>) {
        self.scheme = scheme;
    }

    /// Current phase. An empty deck is immediately complete.
    pub fn phase(&self) -> Phase {
        if self.current_card >= self.flashcards.len() {
            Phase::Complete
        } else {
            Phase::Active
        }
    }

    /// Zero-based cursor, in `[0, deck_len()]`.
    pub fn current_card(&self) -> usize {
        self.current_card
    }

    /// The card under the cursor, `None` once complete.
    pub fn current(&self) -> Option<&Flashcard> {
        self.flashcards.get(self.current_card)
    }

    pub fn deck_len(&self) -> usize {
        self.flashcards.len()
    }

    pub fn show_answer(&self) -> bool {
        self.show_answer
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn card_results(&self) -> &HashMap<usize, CardResult> {
        &self.card_results
    }

    /// Replace the deck and start a fresh run over it.
    ///
    /// Resets the cursor and reveal flag, clears per-card results and
    /// invalidates any pending advance tickets. Accumulated stats carry
    /// over; only [`reset`] zeroes them.
    ///
    /// [`reset`]: SessionController::reset
    pub fn load_cards(&mut self, cards: Vec<Flashcard>) {
        self.flashcards = cards;
        self.current_card = 0;
        self.show_answer = false;
        self.card_results.clear();
        self.epoch += 1;
    }

    /// Toggle answer visibility. No-op unless the session is active; never
    /// touches stats.
    pub fn reveal(&mut self) {
        if self.phase() == Phase::Active {
            self.show_answer = !self.show_answer;
        }
    }

    /// Record an answer for the current card.
    ///
    /// Stats and the per-card result update immediately; the cursor moves
    /// only when the returned ticket is redeemed with [`apply_advance`].
    /// Returns `None` when the session is complete (no current card).
    ///
    /// [`apply_advance`]: SessionController::apply_advance
    pub fn answer(&mut self, correct: bool) -> Option<AnswerOutcome> {
        let card = self.flashcards.get(self.current_card)?;
        let difficulty = card.difficulty;
        let card_id = card.id.clone();

        let xp_gained = self.scheme.reward(difficulty, correct);
        self.stats.record(correct, xp_gained);

        let entry = self
            .card_results
            .entry(self.current_card)
            .or_insert(CardResult {
                correct,
                attempts: 0,
                difficulty,
            });
        entry.attempts += 1;
        entry.correct = correct;
        entry.difficulty = difficulty;

        Some(AnswerOutcome {
            xp_gained,
            card_id,
            advance: AdvanceTicket { epoch: self.epoch },
        })
    }

    /// Redeem a deferred advance: hide the answer and move the cursor by
    /// one, possibly reaching [`Phase::Complete`].
    ///
    /// A stale ticket (session reset or deck reloaded since it was issued)
    /// is discarded. Returns whether the advance was applied.
    pub fn apply_advance(&mut self, ticket: AdvanceTicket) -> bool {
        if ticket.epoch != self.epoch || self.phase() == Phase::Complete {
            return false;
        }
        self.show_answer = false;
        self.current_card += 1;
        true
    }

    /// Return to the start of the loaded deck with zeroed stats.
    ///
    /// The deck itself is retained. Idempotent; pending advance tickets are
    /// invalidated.
    pub fn reset(&mut self) {
        self.current_card = 0;
        self.show_answer = false;
        self.stats = SessionStats::default();
        self.card_results.clear();
        self.epoch += 1;
    }

    /// Read-only snapshot of the session, callable in any phase.
    pub fn export(&self, prompt: &str, timestamp: DateTime<Utc>) -> SessionReport {
        SessionReport {
            session_stats: self.stats.clone(),
            card_results: self.card_results.clone(),
            prompt: prompt.to_string(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_deck;
    use crate::types::Difficulty;
    use pretty_assertions::assert_eq;

    fn card(difficulty: Difficulty) -> Flashcard {
        Flashcard {
            id: None,
            front: "front".into(),
            back: "back".into(),
            category: "test".into(),
            difficulty,
        }
    }

    fn answer_and_advance(controller: &mut SessionController, correct: bool) {
        let outcome = controller.answer(correct).expect("session active");
        assert!(controller.apply_advance(outcome.advance));
    }

    #[test]
    fn empty_deck_is_immediately_complete() {
        let mut controller = SessionController::default();
        controller.load_cards(Vec::new());
        assert_eq!(controller.phase(), Phase::Complete);
        assert_eq!(controller.stats(), &SessionStats::default());
        assert!(controller.answer(true).is_none());
    }

    #[test]
    fn all_correct_run_completes_with_full_streak() {
        let mut controller = SessionController::default();
        controller.load_cards(demo_deck());
        assert_eq!(controller.deck_len(), 10);

        for _ in 0..10 {
            answer_and_advance(&mut controller, true);
        }

        assert_eq!(controller.current_card(), 10);
        assert_eq!(controller.phase(), Phase::Complete);
        assert_eq!(controller.stats().correct, 10);
        assert_eq!(controller.stats().incorrect, 0);
        assert_eq!(controller.stats().max_streak, 10);
    }

    #[test]
    fn streak_resets_on_incorrect_and_max_streak_survives() {
        let mut controller = SessionController::default();
        controller.load_cards(vec![card(Difficulty::Easy); 3]);

        answer_and_advance(&mut controller, false);
        assert_eq!(controller.stats().streak, 0);

        answer_and_advance(&mut controller, true);
        assert_eq!(controller.stats().streak, 1);
        assert_eq!(controller.stats().max_streak, 1);

        answer_and_advance(&mut controller, false);
        assert_eq!(controller.stats().streak, 0);
        assert_eq!(controller.stats().max_streak, 1);
    }

    #[test]
    fn max_streak_never_below_streak() {
        let mut controller = SessionController::default();
        controller.load_cards(vec![card(Difficulty::Medium); 8]);

        for correct in [true, true, false, true, false, true, true, true] {
            let outcome = controller.answer(correct).unwrap();
            let stats = controller.stats();
            assert!(stats.max_streak >= stats.streak);
            assert!(controller.apply_advance(outcome.advance));
        }
    }

    #[test]
    fn reanswering_a_card_accumulates_attempts() {
        let mut controller = SessionController::default();
        controller.load_cards(vec![card(Difficulty::Hard); 2]);

        // Two answers without redeeming the ticket stay on card 0.
        let first = controller.answer(false).unwrap();
        let _second = controller.answer(true).unwrap();

        let result = &controller.card_results()[&0];
        assert_eq!(result.attempts, 2);
        assert_eq!(result.correct, true);
        assert_eq!(result.difficulty, Difficulty::Hard);

        assert!(controller.apply_advance(first.advance));
        assert_eq!(controller.current_card(), 1);
    }

    #[test]
    fn xp_accumulates_and_level_follows() {
        let mut controller = SessionController::default();
        controller.load_cards(vec![card(Difficulty::Hard); 4]);

        for _ in 0..4 {
            answer_and_advance(&mut controller, true);
        }

        // 4 * 30 XP crosses the level-2 boundary.
        assert_eq!(controller.stats().xp, 120);
        assert_eq!(controller.stats().level, 2);
    }

    #[test]
    fn reveal_toggles_only_while_active() {
        let mut controller = SessionController::default();
        controller.load_cards(vec![card(Difficulty::Easy)]);

        controller.reveal();
        assert!(controller.show_answer());
        controller.reveal();
        assert!(!controller.show_answer());

        answer_and_advance(&mut controller, true);
        assert_eq!(controller.phase(), Phase::Complete);
        controller.reveal();
        assert!(!controller.show_answer());
    }

    #[test]
    fn reset_is_idempotent_and_keeps_the_deck() {
        let mut controller = SessionController::default();
        controller.load_cards(demo_deck());
        answer_and_advance(&mut controller, true);
        answer_and_advance(&mut controller, false);

        controller.reset();
        let once = controller.stats().clone();
        controller.reset();

        assert_eq!(controller.stats(), &once);
        assert_eq!(controller.stats(), &SessionStats::default());
        assert_eq!(controller.current_card(), 0);
        assert!(controller.card_results().is_empty());
        assert_eq!(controller.deck_len(), 10);
    }

    #[test]
    fn stale_ticket_after_reset_is_discarded() {
        let mut controller = SessionController::default();
        controller.load_cards(vec![card(Difficulty::Easy); 2]);

        let outcome = controller.answer(true).unwrap();
        controller.reset();

        assert!(!controller.apply_advance(outcome.advance));
        assert_eq!(controller.current_card(), 0);
    }

    #[test]
    fn stale_ticket_after_reload_is_discarded() {
        let mut controller = SessionController::default();
        controller.load_cards(vec![card(Difficulty::Easy); 2]);

        let outcome = controller.answer(true).unwrap();
        controller.load_cards(demo_deck());

        assert!(!controller.apply_advance(outcome.advance));
        assert_eq!(controller.current_card(), 0);
        assert!(controller.card_results().is_empty());
    }

    #[test]
    fn xp_carries_over_across_deck_loads() {
        let mut controller = SessionController::default();
        controller.load_cards(vec![card(Difficulty::Medium); 1]);
        answer_and_advance(&mut controller, true);
        assert_eq!(controller.stats().xp, 20);

        controller.load_cards(demo_deck());
        assert_eq!(controller.stats().xp, 20);
        assert!(controller.card_results().is_empty());
        assert_eq!(controller.current_card(), 0);
    }

    #[test]
    fn export_snapshots_stats_and_results() {
        let mut controller = SessionController::default();
        controller.load_cards(vec![card(Difficulty::Medium); 2]);
        answer_and_advance(&mut controller, true);

        let timestamp = Utc::now();
        let report = controller.export("French basics", timestamp);

        assert_eq!(report.prompt, "French basics");
        assert_eq!(report.timestamp, timestamp);
        assert_eq!(report.session_stats.correct, 1);
        assert_eq!(report.card_results.len(), 1);
    }
}
