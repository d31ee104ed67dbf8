//! Phone-number session gate.

use crate::error::SessionError;
use crate::phone::{self, PhoneNumber};
use crate::storage::{KeyValueStore, PHONE_KEY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated(PhoneNumber),
}

/// Owns the user's identity. Once authenticated it stays that way for the
/// lifetime of the value; there is no logout.
pub struct Session<S> {
    store: S,
    state: SessionState,
    draft: String,
}

impl<S: KeyValueStore> Session<S> {
    /// Start a session from whatever the store remembers.
    ///
    /// A saved value is trusted without re-validation. A store that cannot be
    /// read is treated like an empty one.
    pub fn restore(store: S) -> Self {
        let state = match store.get(PHONE_KEY) {
            Ok(Some(saved)) if !saved.trim().is_empty() => {
                log::info!("restored session for {saved}");
                SessionState::Authenticated(PhoneNumber::restored(saved))
            }
            Ok(_) => SessionState::Unauthenticated,
            Err(e) => {
                log::warn!("could not read saved phone number: {e}");
                SessionState::Unauthenticated
            }
        };
        Self {
            store,
            state,
            draft: String::new(),
        }
    }

    /// Re-format the phone field after a keystroke and return the new draft.
    pub fn update_draft(&mut self, raw: &str) -> &str {
        self.draft = phone::format_draft(raw);
        &self.draft
    }

    /// Validate `draft`, persist the canonical number and authenticate.
    ///
    /// On any error the session stays unauthenticated.
    pub fn login(&mut self, draft: &str) -> Result<PhoneNumber, SessionError> {
        if self.is_authenticated() {
            return Err(SessionError::AlreadyAuthenticated);
        }
        let number = PhoneNumber::parse(draft)?;
        self.store.set(PHONE_KEY, number.as_str())?;
        log::info!("logged in as {number}");
        self.state = SessionState::Authenticated(number.clone());
        Ok(number)
    }

    /// Log in with the current draft.
    pub fn login_with_draft(&mut self) -> Result<PhoneNumber, SessionError> {
        let draft = self.draft.clone();
        self.login(&draft)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn identity(&self) -> Option<&PhoneNumber> {
        match &self.state {
            SessionState::Authenticated(number) => Some(number),
            SessionState::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
