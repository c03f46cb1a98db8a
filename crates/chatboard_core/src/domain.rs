//! crates/chatboard_core/src/domain.rs
//!
//! Defines the core records of the application.
//! The serde shapes here are the persisted wire format and must stay stable
//! across reloads of the same storage profile.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier shared by users and messages: milliseconds since the Unix epoch
/// at creation time, bumped when needed to stay unique.
pub type RecordId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

/// Capitalised label, as shown on the profile page.
impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gender '{0}', expected male, female or other")]
pub struct UnknownGender(pub String);

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(UnknownGender(s.to_string())),
        }
    }
}

/// A registered user, exactly as persisted under the `users` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: RecordId,
    pub name: String,
    /// Unique across all records, compared case-sensitively.
    pub email: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub password: String,
    pub registered_at: DateTime<Utc>,
}

/// A chat message as persisted under the `chatMessages` key.
///
/// Field names on the wire follow the browser app that first wrote this data
/// (`userId`, `userName`, `timestamp`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: RecordId,
    pub text: String,
    #[serde(rename = "userId")]
    pub author_id: RecordId,
    #[serde(rename = "userName")]
    pub author_name: String,
    #[serde(rename = "timestamp")]
    pub sent_at: DateTime<Utc>,
}

/// Picks an id for a new record: the creation time in milliseconds, or one
/// past the largest existing id if the clock has not moved past it.
pub(crate) fn next_record_id(
    now: DateTime<Utc>,
    existing: impl IntoIterator<Item = RecordId>,
) -> RecordId {
    let stamp = now.timestamp_millis();
    match existing.into_iter().max() {
        Some(last) if last >= stamp => last + 1,
        _ => stamp,
    }
}

/// The raw contents of the registration form before validation.
///
/// Every field may be blank; `UserStore::register` decides what is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub gender: Option<Gender>,
    pub date_of_birth: Option<NaiveDate>,
    pub password: String,
}
