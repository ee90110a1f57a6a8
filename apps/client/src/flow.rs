//! Async study flow: orchestrates the session controller and the gateway.
//!
//! The flow owns the busy flag guarding against interleaved requests, the
//! best-effort progress reporting, and the paced cursor advance. Local
//! progression is authoritative: a failed progress report never rolls back
//! stats.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;

use study_core::scoring::{DifficultyScaled, FlatRate};
use study_core::types::SessionReport;
use study_core::{demo_deck, SessionController};

use crate::error::{GatewayError, Result};
use crate::gateway::{AuthSession, GatewayClient, Subject};

/// Prompt attached to demo sessions.
pub const DEMO_PROMPT: &str = "French GCSE vocabulary - basic family members and greetings";

/// Outcome of answering one card through the flow.
#[derive(Debug)]
pub struct AnswerReport {
    pub xp_gained: u32,
    /// Non-fatal failure from the best-effort progress report, surfaced to
    /// the caller without touching local stats.
    pub progress_error: Option<GatewayError>,
}

/// Drives one study session against a configured backend.
pub struct StudyFlow {
    controller: SessionController,
    gateway: GatewayClient,
    auth: Option<AuthSession>,
    prompt: String,
    advance_delay: Duration,
    busy: bool,
}

impl StudyFlow {
    pub fn new(gateway: GatewayClient, advance_delay: Duration) -> Self {
        Self {
            controller: SessionController::new(Box::new(DifficultyScaled)),
            gateway,
            auth: None,
            prompt: String::new(),
            advance_delay,
            busy: false,
        }
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }

    /// Log in and hold the auth session until logout or an auth failure.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let auth = self.gateway.login(email, password).await?;
        tracing::info!(user = %auth.user.email, "logged in");
        self.auth = Some(auth);
        Ok(())
    }

    /// Register a new account and hold the resulting auth session.
    pub async fn register(&mut self, email: &str, password: &str) -> Result<()> {
        let auth = self.gateway.register(email, password).await?;
        tracing::info!(user = %auth.user.email, "registered");
        self.auth = Some(auth);
        Ok(())
    }

    /// Drop the auth session.
    pub fn logout(&mut self) {
        self.auth = None;
    }

    /// List the account's subjects.
    pub async fn subjects(&mut self) -> Result<Vec<Subject>> {
        let auth = self.require_auth()?;
        let result = self.gateway.list_subjects(&auth).await;
        self.note_auth_failure(&result);
        result
    }

    /// Create a subject with a name and generation prompt.
    pub async fn create_subject(&mut self, name: &str, prompt: &str) -> Result<Subject> {
        let auth = self.require_auth()?;
        let result = self.gateway.create_subject(&auth, name, prompt).await;
        self.note_auth_failure(&result);
        result
    }

    /// Load the built-in demo deck. No network involved.
    pub fn start_demo(&mut self) -> Result<()> {
        if self.busy {
            return Err(GatewayError::Busy);
        }
        self.prompt = DEMO_PROMPT.to_string();
        self.controller.set_scheme(Box::new(DifficultyScaled));
        self.controller.load_cards(demo_deck());
        tracing::info!("demo session started");
        Ok(())
    }

    /// Generate a fresh deck from a prompt and start studying it.
    ///
    /// On any failure the prior deck is left untouched so the user can
    /// retry. Returns the number of cards loaded.
    pub async fn generate(&mut self, prompt: &str, api_key: &str) -> Result<usize> {
        if self.busy {
            return Err(GatewayError::Busy);
        }
        self.busy = true;
        let result = self.gateway.generate_cards(prompt, api_key).await;
        self.busy = false;

        let cards = result?;
        let count = cards.len();
        self.prompt = prompt.to_string();
        self.controller.set_scheme(Box::new(DifficultyScaled));
        self.controller.load_cards(cards);
        tracing::info!(cards = count, "generated deck loaded");
        Ok(count)
    }

    /// Generate and persist cards for an existing subject, then study the
    /// freshly generated deck.
    ///
    /// On any failure the prior deck is left untouched. Returns the number
    /// of cards loaded.
    pub async fn generate_for_subject(&mut self, subject: &Subject) -> Result<usize> {
        if self.busy {
            return Err(GatewayError::Busy);
        }
        let auth = self.require_auth()?;

        self.busy = true;
        let result = self.gateway.generate_subject_cards(&auth, &subject.id).await;
        self.busy = false;
        self.note_auth_failure(&result);

        let cards = result?;
        let count = cards.len();
        self.prompt = subject.prompt.clone();
        self.controller.set_scheme(Box::new(FlatRate));
        self.controller.load_cards(cards);
        tracing::info!(subject = %subject.name, cards = count, "subject deck generated");
        Ok(count)
    }

    /// Fetch due cards for a subject and start studying them with the
    /// flat-rate reward scheme.
    pub async fn study_subject(&mut self, subject: &Subject, limit: usize) -> Result<usize> {
        if self.busy {
            return Err(GatewayError::Busy);
        }
        let auth = self.require_auth()?;

        self.busy = true;
        let result = self
            .gateway
            .fetch_study_cards(&auth, &subject.id, limit)
            .await;
        self.busy = false;
        self.note_auth_failure(&result);

        let cards = result?;
        let count = cards.len();
        self.prompt = subject.prompt.clone();
        self.controller.set_scheme(Box::new(FlatRate));
        self.controller.load_cards(cards);
        tracing::info!(subject = %subject.name, cards = count, "subject session started");
        Ok(count)
    }

    /// Toggle answer visibility on the current card.
    pub fn reveal(&mut self) {
        self.controller.reveal();
    }

    /// Record an answer for the current card.
    ///
    /// Stats update immediately; if the card is backend-persisted its
    /// progress is reported best-effort; the cursor advances only after the
    /// configured delay. Returns `Ok(None)` once the session is complete.
    pub async fn answer(&mut self, correct: bool) -> Result<Option<AnswerReport>> {
        if self.busy {
            return Err(GatewayError::Busy);
        }

        let Some(outcome) = self.controller.answer(correct) else {
            return Ok(None);
        };

        self.busy = true;

        let mut progress_error = None;
        if let Some(card_id) = &outcome.card_id {
            if let Err(err) = self
                .gateway
                .record_progress(self.auth.as_ref(), card_id, correct)
                .await
            {
                tracing::warn!(%card_id, error = %err, "progress report failed, keeping local stats");
                progress_error = Some(err);
            }
        }

        tokio::time::sleep(self.advance_delay).await;
        self.controller.apply_advance(outcome.advance);
        self.busy = false;

        Ok(Some(AnswerReport {
            xp_gained: outcome.xp_gained,
            progress_error,
        }))
    }

    /// Restart the current deck with zeroed stats.
    pub fn reset(&mut self) {
        self.controller.reset();
    }

    /// Snapshot of the session for export.
    pub fn export(&self) -> SessionReport {
        self.controller.export(&self.prompt, Utc::now())
    }

    /// Write the session report as pretty JSON into `dir`, returning the
    /// created path.
    pub fn write_report(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        let report = self.export();
        let path = dir.join(format!(
            "flashcard-progress-{}.json",
            report.timestamp.timestamp_millis()
        ));
        std::fs::write(&path, serde_json::to_string_pretty(&report)?)?;
        tracing::info!(path = %path.display(), "session report written");
        Ok(path)
    }

    fn require_auth(&self) -> Result<AuthSession> {
        self.auth
            .clone()
            .ok_or_else(|| GatewayError::Auth("not authenticated".to_string()))
    }

    /// An auth failure invalidates the held token.
    fn note_auth_failure<T>(&mut self, result: &Result<T>) {
        if let Err(GatewayError::Auth(_)) = result {
            self.auth = None;
        }
    }
}
