//! crates/chatboard_core/src/validation.rs
//!
//! Field-level checks for the registration form.

use crate::domain::{Gender, RegistrationForm};
use chrono::NaiveDate;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

pub const MIN_PASSWORD_LEN: usize = 6;

/// The registration form fields, in the order they are checked and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Gender,
    DateOfBirth,
    Password,
}

/// One problem with one field. The `Display` text is the inline message shown
/// next to the field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("Name is required")]
    NameRequired,
    #[error("Email is required")]
    EmailRequired,
    #[error("Invalid email format")]
    InvalidEmailFormat,
    #[error("Gender is required")]
    GenderRequired,
    #[error("Date of birth is required")]
    DateOfBirthRequired,
    #[error("Password is required")]
    PasswordRequired,
    #[error("Password must be at least 6 characters")]
    WeakPassword,
}

impl FieldError {
    pub fn field(&self) -> Field {
        match self {
            FieldError::NameRequired => Field::Name,
            FieldError::EmailRequired | FieldError::InvalidEmailFormat => Field::Email,
            FieldError::GenderRequired => Field::Gender,
            FieldError::DateOfBirthRequired => Field::DateOfBirth,
            FieldError::PasswordRequired | FieldError::WeakPassword => Field::Password,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            FieldError::NameRequired
                | FieldError::EmailRequired
                | FieldError::GenderRequired
                | FieldError::DateOfBirthRequired
                | FieldError::PasswordRequired
        )
    }
}

/// Every failing field, at most one error per field, in field order.
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// The error a single-message surface should show.
    pub fn first(&self) -> &FieldError {
        &self.0[0]
    }

    pub fn for_field(&self, field: Field) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field() == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.first(), f)
    }
}

/// A registration form that passed every field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRegistration {
    pub name: String,
    pub email: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub password: String,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email_pattern().is_match(email)
}

/// Checks every field of `form` and either returns the cleaned values or all
/// field errors found.
pub fn validate_registration(form: &RegistrationForm) -> Result<ValidRegistration, ValidationErrors> {
    let mut errors = Vec::new();

    let name = form.name.trim();
    if name.is_empty() {
        errors.push(FieldError::NameRequired);
    }

    let email = form.email.trim();
    if email.is_empty() {
        errors.push(FieldError::EmailRequired);
    } else if !is_valid_email(email) {
        errors.push(FieldError::InvalidEmailFormat);
    }

    if form.gender.is_none() {
        errors.push(FieldError::GenderRequired);
    }

    if form.date_of_birth.is_none() {
        errors.push(FieldError::DateOfBirthRequired);
    }

    if form.password.is_empty() {
        errors.push(FieldError::PasswordRequired);
    } else if form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::WeakPassword);
    }

    match (form.gender, form.date_of_birth) {
        (Some(gender), Some(date_of_birth)) if errors.is_empty() => Ok(ValidRegistration {
            name: name.to_string(),
            email: email.to_string(),
            gender,
            date_of_birth,
            password: form.password.clone(),
        }),
        _ => Err(ValidationErrors(errors)),
    }
}
