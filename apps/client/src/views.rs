//! Top-level view navigation.
//!
//! The account-based UI moves between four screens. Transitions are an
//! explicit table rather than ad-hoc string state, and are independent of
//! the session controller's own Active/Complete machine.

use thiserror::Error;

/// Application view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Login / register screen; the only view without a token.
    Auth,
    /// Subject list for the authenticated account.
    Subjects,
    /// Subject creation form.
    CreateSubject,
    /// Active quiz over a loaded deck.
    Study,
}

/// Rejected view transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid view transition: {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: View,
    pub to: View,
}

/// Holds the current view and enforces the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    view: View,
}

impl Default for Navigator {
    fn default() -> Self {
        Self { view: View::Auth }
    }
}

impl Navigator {
    pub fn view(&self) -> View {
        self.view
    }

    /// Move to another view if the transition is allowed.
    ///
    /// Any view may fall back to `Auth` (logout or an auth failure).
    pub fn go(&mut self, to: View) -> Result<(), InvalidTransition> {
        let allowed = matches!(
            (self.view, to),
            (_, View::Auth)
                | (View::Auth, View::Subjects)
                | (View::Subjects, View::CreateSubject)
                | (View::Subjects, View::Study)
                | (View::CreateSubject, View::Subjects)
                | (View::Study, View::Subjects)
        );
        if !allowed {
            return Err(InvalidTransition {
                from: self.view,
                to,
            });
        }
        self.view = to;
        Ok(())
    }
}
