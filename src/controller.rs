//! Email step controller. Owns the field state for the signup email screen.
//!
//! DESIGN
//! ======
//! Every handler mutates one `EmailFieldState` behind a std mutex that is
//! never held across an `.await`. A validation pass snapshots the email,
//! runs the local validator, optionally awaits the uniqueness checker, and
//! commits `{error_message, is_valid}` in a single lock scope so no reader
//! sees a new error paired with the old validity.
//!
//! Typing re-validates through the debouncer; submitting validates
//! immediately. Passes are not ordered: whichever commits last wins, and a
//! stale pass still commits unless `discard_stale` is configured, in which
//! case each pass carries a generation and only the newest may commit.
//!
//! ERROR HANDLING
//! ==============
//! Validation outcomes are data, never `Err`. A failing uniqueness checker is
//! logged and surfaces as a generic "could not verify" message, which keeps
//! the field invalid until a later pass succeeds.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SignupConfig;
use crate::debounce::Debouncer;
use crate::uniqueness::UniquenessChecker;
use crate::validation::EmailValidator;

pub const UNAVAILABLE_EMAIL: &str = "Unavailable email";
pub const VERIFY_FAILED: &str = "Could not verify email, please try again";
pub const ENTER_KEY: &str = "Enter";

const EMAIL_FIELD: &str = "email";

// =============================================================================
// TYPES
// =============================================================================

/// Payload handed to the parent flow when the step completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    pub email: String,
}

pub type DoneCallback = Arc<dyn Fn(EmailRecord) + Send + Sync>;

/// Construction parameters supplied by the parent flow.
pub struct ScreenProps {
    /// Resumed draft value, empty for a fresh signup.
    pub initial_email: String,
    pub done_callback: DoneCallback,
    /// One-shot error from the parent, e.g. a server rejection on a previous submit.
    pub external_error: Option<String>,
    pub loading: bool,
}

impl ScreenProps {
    #[must_use]
    pub fn new(done_callback: impl Fn(EmailRecord) + Send + Sync + 'static) -> Self {
        Self { initial_email: String::new(), done_callback: Arc::new(done_callback), external_error: None, loading: false }
    }

    #[must_use]
    pub fn with_initial_email(mut self, email: impl Into<String>) -> Self {
        self.initial_email = email.into();
        self
    }

    #[must_use]
    pub fn with_external_error(mut self, error: impl Into<String>) -> Self {
        self.external_error = Some(error.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailFieldState {
    pub email: String,
    /// Message from the last committed pass; `None` means no error.
    pub error_message: Option<String>,
    pub is_valid: bool,
    pub pending_external_error: Option<String>,
    pub loading: bool,
}

impl EmailFieldState {
    fn commit(&mut self, error: Option<String>) {
        self.is_valid = error.is_none();
        self.error_message = error;
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

struct Shared {
    state: Mutex<EmailFieldState>,
    validator: Arc<dyn EmailValidator>,
    checker: Arc<dyn UniquenessChecker>,
    done_callback: DoneCallback,
    skip_uniqueness_check: bool,
    discard_stale: bool,
    generation: AtomicU64,
}

pub struct EmailValidationController {
    shared: Arc<Shared>,
    debouncer: Debouncer,
}

impl EmailValidationController {
    /// Mount the controller. The seeded email is not validated until the
    /// user types or submits.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn new(
        props: ScreenProps,
        validator: Arc<dyn EmailValidator>,
        checker: Arc<dyn UniquenessChecker>,
        config: &SignupConfig,
    ) -> Self {
        let state = EmailFieldState {
            email: props.initial_email,
            error_message: None,
            is_valid: false,
            pending_external_error: props.external_error,
            loading: props.loading,
        };
        let shared = Arc::new(Shared {
            state: Mutex::new(state),
            validator,
            checker,
            done_callback: props.done_callback,
            skip_uniqueness_check: config.skip_uniqueness_check,
            discard_stale: config.discard_stale,
            generation: AtomicU64::new(0),
        });

        let pass_target = shared.clone();
        let debouncer = Debouncer::spawn(config.debounce, move || {
            let shared = pass_target.clone();
            async move {
                shared.validate().await;
            }
        });

        Self { shared, debouncer }
    }

    /// Store the new value and schedule a debounced validation pass.
    pub fn on_text_changed(&self, value: impl Into<String>) {
        self.shared.lock().email = value.into();
        self.debouncer.trigger();
    }

    /// Submit on Enter, but only if the last committed pass was valid.
    /// Returns whether the done callback fired.
    pub async fn on_key_event(&self, key: &str) -> bool {
        if key == ENTER_KEY && self.is_valid() {
            self.on_submit().await
        } else {
            false
        }
    }

    /// Validate immediately and hand the email to the parent flow if valid.
    /// Returns whether the done callback fired.
    pub async fn on_submit(&self) -> bool {
        if !self.shared.validate().await {
            return false;
        }
        let record = EmailRecord { email: self.email() };
        info!("email step submitted");
        (self.shared.done_callback)(record);
        true
    }

    /// Run one validation pass now, bypassing the debounce.
    pub async fn validate(&self) -> bool {
        self.shared.validate().await
    }

    /// Error to render under the input. The pending external error is
    /// consumed by every call, even when the state error wins.
    pub fn display_error(&self) -> Option<String> {
        let mut state = self.shared.lock();
        let external = state.pending_external_error.take();
        state.error_message.clone().or(external)
    }

    pub fn set_external_error(&self, error: impl Into<String>) {
        self.shared.lock().pending_external_error = Some(error.into());
    }

    pub fn set_loading(&self, loading: bool) {
        self.shared.lock().loading = loading;
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.shared.lock().loading
    }

    #[must_use]
    pub fn email(&self) -> String {
        self.shared.lock().email.clone()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.shared.lock().is_valid
    }

    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.shared.lock().error_message.clone()
    }

    #[must_use]
    pub fn snapshot(&self) -> EmailFieldState {
        self.shared.lock().clone()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, EmailFieldState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn validate(&self) -> bool {
        let pass = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let email = self.lock().email.clone();

        let error = self.check(&email).await;
        let is_valid = error.is_none();

        let mut state = self.lock();
        if self.discard_stale && self.generation.load(Ordering::SeqCst) != pass {
            debug!(pass, "discarding stale validation result");
            return false;
        }
        debug!(pass, is_valid, error = error.as_deref().unwrap_or(""), "validation pass committed");
        state.commit(error);
        is_valid
    }

    async fn check(&self, email: &str) -> Option<String> {
        if let Some(local) = self.validator.check_email(email) {
            return Some(local);
        }
        if self.skip_uniqueness_check {
            return None;
        }
        match self.checker.is_available(EMAIL_FIELD, email).await {
            Ok(true) => None,
            Ok(false) => Some(UNAVAILABLE_EMAIL.to_owned()),
            Err(e) => {
                warn!(error = %e, "email uniqueness check failed");
                Some(VERIFY_FAILED.to_owned())
            }
        }
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
