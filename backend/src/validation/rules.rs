//! Field rules mirroring the identity and profile schema constraints.

use std::borrow::Cow;

use validator::{ValidateEmail, ValidationError};

pub const USERNAME_MAX_LENGTH: usize = 150;
pub const EMAIL_MAX_LENGTH: usize = 254;
pub const BIO_MAX_LENGTH: u64 = 500;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Validates username format.
///
/// Requirements:
/// - At most 150 characters
/// - Letters, digits and `@ . + - _` only
///
/// Emptiness is covered by the `length` attribute on the field.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.chars().count() > USERNAME_MAX_LENGTH {
        return Err(error(
            "username_too_long",
            "Ensure this value has at most 150 characters.",
        ));
    }

    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !username.chars().all(allowed) {
        return Err(error(
            "username_invalid_characters",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        ));
    }
    Ok(())
}

/// Validates an optional email address; an empty value is accepted.
pub fn validate_optional_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Ok(());
    }
    if email.chars().count() > EMAIL_MAX_LENGTH || !email.validate_email() {
        return Err(error("email_invalid", "Enter a valid email address."));
    }
    Ok(())
}
