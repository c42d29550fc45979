//! Account registration form.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{strip, FieldRule, Form};
use crate::validation::rules;

pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
/// Submitted registration fields. Missing keys arrive as empty strings.
pub struct RegistrationForm {
    #[validate(
        length(min = 1, message = "This field is required."),
        custom(function = "rules::validate_username")
    )]
    pub username: String,
    #[validate(custom(function = "rules::validate_optional_email"))]
    pub email: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
    /// Confirmation of `password`.
    #[validate(length(min = 1, message = "This field is required."))]
    pub password2: String,
}

/// Registration data that passed every check. The password is still plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedUser {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

fn passwords_match(form: &RegistrationForm) -> Option<String> {
    let (pw, pw2) = (&form.password, &form.password2);
    if !pw.is_empty() && !pw2.is_empty() && pw != pw2 {
        return Some(PASSWORD_MISMATCH.to_string());
    }
    None
}

const RULES: &[FieldRule<RegistrationForm>] = &[FieldRule {
    name: "passwords_match",
    field: "password2",
    check: passwords_match,
}];

impl Form for RegistrationForm {
    type Validated = ValidatedUser;

    fn rules() -> &'static [FieldRule<Self>] {
        RULES
    }

    fn clean(&mut self) {
        strip(&mut self.username);
        strip(&mut self.email);
        strip(&mut self.password);
        strip(&mut self.password2);
    }

    fn into_validated(self) -> ValidatedUser {
        ValidatedUser {
            username: self.username,
            email: self.email,
            password: self.password,
        }
    }
}
