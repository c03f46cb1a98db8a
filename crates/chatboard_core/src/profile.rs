//! crates/chatboard_core/src/profile.rs
//!
//! Read-only values derived from a `UserRecord` for the profile page, and the
//! date/time renderings shared with the chat timeline.

use crate::domain::{RecordId, UserRecord};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use std::fmt::Display;

const DATE_FORMAT: &str = "%-m/%-d/%Y";
const TIME_FORMAT: &str = "%H:%M";

/// Whole years from `date_of_birth` to `as_of`, counting a year only once the
/// birthday has been reached.
pub fn age(date_of_birth: NaiveDate, as_of: NaiveDate) -> i32 {
    let years = as_of.year() - date_of_birth.year();
    if (as_of.month(), as_of.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years - 1
    } else {
        years
    }
}

pub fn format_day(day: NaiveDate) -> String {
    day.format(DATE_FORMAT).to_string()
}

pub fn format_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format(DATE_FORMAT).to_string()
}

pub fn format_time<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    at.format(TIME_FORMAT).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
    pub name: String,
    pub email: String,
    pub gender: String,
    pub date_of_birth: String,
    pub age: i32,
    pub user_id: RecordId,
    pub registered: String,
}

impl ProfileView {
    /// Builds the view as seen at `now`, with dates rendered in `now`'s zone.
    pub fn new<Tz: TimeZone>(user: &UserRecord, now: &DateTime<Tz>) -> Self
    where
        Tz::Offset: Display,
    {
        let registered_local = user.registered_at.with_timezone(&now.timezone());
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            gender: user.gender.to_string(),
            date_of_birth: format_day(user.date_of_birth),
            age: age(user.date_of_birth, now.date_naive()),
            user_id: user.id,
            registered: format_date(&registered_local),
        }
    }

    /// Label/value pairs in display order.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Name", self.name.clone()),
            ("Email", self.email.clone()),
            ("Gender", self.gender.clone()),
            ("Date of Birth", self.date_of_birth.clone()),
            ("Age", format!("{} years", self.age)),
            ("User ID", self.user_id.to_string()),
            ("Registration Date", self.registered.clone()),
        ]
    }
}
