//! Signup email step: field state plus debounced validation.
//!
//! ARCHITECTURE
//! ============
//! The wizard's email screen is a thin view over `EmailValidationController`.
//! The controller owns the field state and talks to two collaborators: a
//! synchronous `EmailValidator` and an async `UniquenessChecker`. Typing goes
//! through a trailing-edge `Debouncer`; submission validates immediately.

pub mod config;
pub mod controller;
pub mod db;
pub mod debounce;
pub mod uniqueness;
pub mod validation;

pub use config::SignupConfig;
pub use controller::{EmailFieldState, EmailRecord, EmailValidationController, ScreenProps};
pub use uniqueness::{MemoryUniquenessChecker, PgUniquenessChecker, UniquenessChecker, UniquenessError};
pub use validation::{DefaultEmailValidator, EmailValidator};
