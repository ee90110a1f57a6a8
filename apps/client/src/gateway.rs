//! HTTP client for the card generation and study backend.
//!
//! Every call is a single request/response round trip; there is no
//! streaming, no retry and no timeout beyond the transport default. Input
//! validation (API key prefix, empty prompt/name) happens locally before
//! any request is issued to avoid a wasted round trip.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use study_core::types::Flashcard;

use crate::error::{GatewayError, Result};

/// Expected prefix of an upstream API key.
pub const API_KEY_PREFIX: &str = "sk-ant-";

/// Authenticated account, as returned by login/register.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

/// Explicit auth context passed to calls that need it.
///
/// Created on successful authentication, dropped on logout, never stored
/// ambiently.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// A named, persisted grouping of flashcards tied to an account.
#[derive(Debug, Clone, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub prompt: String,
    pub card_count: u32,
}

// === API Request/Response Types ===

#[derive(Debug, Serialize)]
struct CredentialsRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    user: User,
}

#[derive(Debug, Deserialize)]
struct SubjectsResponse {
    subjects: Vec<Subject>,
}

#[derive(Debug, Serialize)]
struct CreateSubjectRequest<'a> {
    name: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateSubjectResponse {
    subject: Subject,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    #[serde(rename = "apiKey")]
    api_key: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    flashcards: Vec<Flashcard>,
}

#[derive(Debug, Deserialize)]
struct StudyResponse {
    cards: Vec<Flashcard>,
}

#[derive(Debug, Serialize)]
struct ProgressRequest {
    correct: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

// === Local pre-validation ===

/// Check the API key shape before calling out.
pub fn validate_api_key(api_key: &str) -> Result<()> {
    if api_key.trim().is_empty() {
        return Err(GatewayError::Validation(
            "API key must not be empty".to_string(),
        ));
    }
    if !api_key.starts_with(API_KEY_PREFIX) {
        return Err(GatewayError::Validation(format!(
            "API key should start with \"{API_KEY_PREFIX}\""
        )));
    }
    Ok(())
}

/// Check that a study prompt is non-empty.
pub fn validate_prompt(prompt: &str) -> Result<()> {
    if prompt.trim().is_empty() {
        return Err(GatewayError::Validation(
            "prompt must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Check that a subject name is non-empty.
pub fn validate_subject_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(GatewayError::Validation(
            "subject name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Client for the backend gateway.
#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    backend_url: String,
}

impl GatewayClient {
    /// Create a client against the given base URL.
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            backend_url: backend_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Log in with existing credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.authenticate("/auth/login", email, password).await
    }

    /// Register a new account. Fails with an auth error on duplicate
    /// registration.
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthSession> {
        self.authenticate("/auth/register", email, password).await
    }

    /// List the account's subjects.
    pub async fn list_subjects(&self, auth: &AuthSession) -> Result<Vec<Subject>> {
        let url = format!("{}/subjects", self.backend_url);
        tracing::debug!(%url, "listing subjects");

        let resp = self
            .client
            .get(&url)
            .bearer_auth(&auth.token)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::backend_failure(resp).await);
        }

        let response: SubjectsResponse = resp
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        Ok(response.subjects)
    }

    /// Create a subject with a name and generation prompt.
    pub async fn create_subject(
        &self,
        auth: &AuthSession,
        name: &str,
        prompt: &str,
    ) -> Result<Subject> {
        validate_subject_name(name)?;
        validate_prompt(prompt)?;

        let url = format!("{}/subjects", self.backend_url);
        let request = CreateSubjectRequest { name, prompt };

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&auth.token)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::backend_failure(resp).await);
        }

        let response: CreateSubjectResponse = resp
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        Ok(response.subject)
    }

    /// Generate a one-off deck from a free-text prompt.
    ///
    /// The API key and prompt are validated locally first; a malformed key
    /// never reaches the network.
    pub async fn generate_cards(&self, prompt: &str, api_key: &str) -> Result<Vec<Flashcard>> {
        validate_api_key(api_key)?;
        validate_prompt(prompt)?;

        let url = format!("{}/generate-cards", self.backend_url);
        tracing::debug!(%url, "requesting card generation");
        let request = GenerateRequest { prompt, api_key };

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Self::cards_from_generation(resp).await
    }

    /// Generate and persist cards for an existing subject.
    pub async fn generate_subject_cards(
        &self,
        auth: &AuthSession,
        subject_id: &str,
    ) -> Result<Vec<Flashcard>> {
        let url = format!("{}/subjects/{}/generate-cards", self.backend_url, subject_id);
        tracing::debug!(%url, "requesting subject card generation");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&auth.token)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        Self::cards_from_generation(resp).await
    }

    /// Fetch due cards for a subject.
    pub async fn fetch_study_cards(
        &self,
        auth: &AuthSession,
        subject_id: &str,
        limit: usize,
    ) -> Result<Vec<Flashcard>> {
        let url = format!("{}/subjects/{}/study", self.backend_url, subject_id);
        tracing::debug!(%url, limit, "fetching study cards");

        let resp = self
            .client
            .get(&url)
            .query(&[("limit", limit)])
            .bearer_auth(&auth.token)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Self::backend_failure(resp).await);
        }

        let response: StudyResponse = resp
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        if response.cards.is_empty() {
            return Err(GatewayError::EmptyDeck);
        }

        Ok(response.cards)
    }

    /// Report one answered card. Best-effort: any failure comes back as a
    /// non-fatal progress-report error and local stats are kept.
    pub async fn record_progress(
        &self,
        auth: Option<&AuthSession>,
        card_id: &str,
        correct: bool,
    ) -> Result<()> {
        let url = format!("{}/cards/{}/progress", self.backend_url, card_id);
        let request = ProgressRequest { correct };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(auth) = auth {
            builder = builder.bearer_auth(&auth.token);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| GatewayError::ProgressReport(e.to_string()))?;

        if !resp.status().is_success() {
            let (status, message) = Self::failure_parts(resp).await;
            return Err(GatewayError::ProgressReport(format!(
                "{status}: {message}"
            )));
        }

        Ok(())
    }

    // === Private methods ===

    async fn authenticate(&self, path: &str, email: &str, password: &str) -> Result<AuthSession> {
        let url = format!("{}{}", self.backend_url, path);
        let request = CredentialsRequest { email, password };

        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| GatewayError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let (_, message) = Self::failure_parts(resp).await;
            return Err(GatewayError::Auth(message));
        }

        let response: AuthResponse = resp
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        Ok(AuthSession {
            token: response.token,
            user: response.user,
        })
    }

    async fn cards_from_generation(resp: reqwest::Response) -> Result<Vec<Flashcard>> {
        if !resp.status().is_success() {
            let (status, message) = Self::failure_parts(resp).await;
            if status == 401 || status == 403 {
                return Err(GatewayError::Auth(message));
            }
            return Err(GatewayError::Generation(message));
        }

        let response: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))?;

        if response.flashcards.is_empty() {
            return Err(GatewayError::Generation(
                "no flashcards received from server".to_string(),
            ));
        }

        Ok(response.flashcards)
    }

    /// Map a non-2xx response to the common error variants.
    async fn backend_failure(resp: reqwest::Response) -> GatewayError {
        let (status, message) = Self::failure_parts(resp).await;
        if status == 401 || status == 403 {
            GatewayError::Auth(message)
        } else {
            GatewayError::Backend { status, message }
        }
    }

    /// Extract the status and the `{error}` body (falling back to raw text).
    async fn failure_parts(resp: reqwest::Response) -> (u16, String) {
        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        (status, message)
    }
}
