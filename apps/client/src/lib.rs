//! Flashcard study client: backend gateway, view navigation and the async
//! study flow over the pure session core.

pub mod config;
pub mod error;
pub mod flow;
pub mod gateway;
pub mod views;

pub use config::Config;
pub use error::{GatewayError, Result};
pub use flow::{AnswerReport, StudyFlow};
pub use gateway::{AuthSession, GatewayClient, Subject, User};
pub use views::{InvalidTransition, Navigator, View};
