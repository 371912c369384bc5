//! Local email validation.
//!
//! Pure and synchronous. A `None` result means the value is syntactically
//! acceptable; `Some(message)` is shown to the user as-is.

pub const EMAIL_REQUIRED: &str = "Email is required";
pub const EMAIL_FORMAT: &str = "Please enter an email in format: yourname@example.com";

const MAX_EMAIL_LEN: usize = 254;

/// Judges local syntactic validity of an email string.
pub trait EmailValidator: Send + Sync {
    fn check_email(&self, email: &str) -> Option<String>;
}

impl<F> EmailValidator for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn check_email(&self, email: &str) -> Option<String> {
        self(email)
    }
}

/// The signup user-model rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEmailValidator;

impl EmailValidator for DefaultEmailValidator {
    fn check_email(&self, email: &str) -> Option<String> {
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Some(EMAIL_REQUIRED.to_owned());
        }
        if !is_well_formed(trimmed) {
            return Some(EMAIL_FORMAT.to_owned());
        }
        None
    }
}

fn is_well_formed(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }
    let parts = email.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() {
        return false;
    }
    let domain = parts[1];
    // Require a TLD: at least one dot, and no empty labels.
    domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
