//! # Form Validation
//!
//! Local checks for the login and registration forms, plus country-code
//! input from the command line.
//!
//! ## Rules
//! ```text
//! ┌──────────────────┬──────────┬───────────────────────────────────────────┐
//! │ Field            │ Form     │ Check (first failing one is reported)     │
//! ├──────────────────┼──────────┼───────────────────────────────────────────┤
//! │ Username         │ both     │ non-blank                                 │
//! │ Email            │ register │ non-blank, looks like `x@y.z`             │
//! │ Password         │ both     │ non-empty, at least 6 characters          │
//! │ Confirm password │ register │ equal to password                         │
//! └──────────────────┴──────────┴───────────────────────────────────────────┘
//! ```
//!
//! Every failing field gets its own message; validation does not stop at the
//! first bad field.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::MIN_PASSWORD_LENGTH;

// =============================================================================
// Fields
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Username,
    Email,
    Password,
    ConfirmPassword,
}

impl FormField {
    /// Label used at the start of validation messages.
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Username => "Username",
            FormField::Email => "Email",
            FormField::Password => "Password",
            FormField::ConfirmPassword => "Confirm password",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<FormField, ValidationError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: FormField, error: ValidationError) {
        self.0.insert(field, error);
    }

    pub fn get(&self, field: FormField) -> Option<&ValidationError> {
        self.0.get(&field)
    }

    /// Message for `field`, ready to show under the input.
    pub fn message(&self, field: FormField) -> Option<String> {
        self.get(field).map(ToString::to_string)
    }

    /// Drops the message for a field the user has started editing.
    pub fn clear_field(&mut self, field: FormField) {
        self.0.remove(&field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &ValidationError)> {
        self.0.iter().map(|(field, err)| (*field, err))
    }

    /// Converts an empty set into `Ok(())`.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.values().map(ToString::to_string).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

// =============================================================================
// Forms
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Validates the login form.
pub fn validate_login(form: &LoginForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_username(&form.username, &mut errors);
    check_password(&form.password, &mut errors);
    errors.into_result()
}

/// Validates the registration form.
pub fn validate_register(form: &RegisterForm) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    check_username(&form.username, &mut errors);

    if form.email.trim().is_empty() {
        errors.insert(FormField::Email, required(FormField::Email));
    } else if !is_valid_email(&form.email) {
        errors.insert(
            FormField::Email,
            ValidationError::Invalid {
                field: FormField::Email.label().to_string(),
            },
        );
    }

    check_password(&form.password, &mut errors);

    if form.password != form.confirm_password {
        errors.insert(FormField::ConfirmPassword, ValidationError::PasswordMismatch);
    }

    errors.into_result()
}

fn check_username(username: &str, errors: &mut FieldErrors) {
    if username.trim().is_empty() {
        errors.insert(FormField::Username, required(FormField::Username));
    }
}

fn check_password(password: &str, errors: &mut FieldErrors) {
    if password.is_empty() {
        errors.insert(FormField::Password, required(FormField::Password));
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        errors.insert(
            FormField::Password,
            ValidationError::TooShort {
                field: FormField::Password.label().to_string(),
                min: MIN_PASSWORD_LENGTH,
            },
        );
    }
}

fn required(field: FormField) -> ValidationError {
    ValidationError::Required {
        field: field.label().to_string(),
    }
}

/// Non-whitespace, `@`, non-whitespace, `.`, non-whitespace. Unanchored,
/// so surrounding text is tolerated.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

/// Loose email shape check: some non-blank text, `@`, non-blank text, `.`,
/// non-blank text, with no whitespace in between.
///
/// ```rust
/// use atlas_core::validation::is_valid_email;
///
/// assert!(is_valid_email("test@example.com"));
/// assert!(!is_valid_email("invalid-email"));
/// ```
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

// =============================================================================
// Country Codes
// =============================================================================

/// Normalises a country code typed by the user.
///
/// Accepts 2 or 3 ASCII alphanumerics (cca2, cca3 or ccn3) and returns them
/// upper-cased.
pub fn validate_country_code(code: &str) -> ValidationResult<String> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "Country code".to_string(),
        });
    }
    if !(2..=3).contains(&code.len()) || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::InvalidFormat {
            field: "Country code".to_string(),
            reason: "expected 2 or 3 letters or digits".to_string(),
        });
    }
    Ok(code.to_ascii_uppercase())
}
