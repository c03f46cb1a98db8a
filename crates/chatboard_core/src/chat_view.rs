//! crates/chatboard_core/src/chat_view.rs
//!
//! Presentation helpers for the chat room: day separators, own-message
//! marking, and the compose box limits.

use crate::domain::{ChatMessage, UserRecord};
use crate::profile::{format_day, format_time};
use chrono::{DateTime, Days, NaiveDate, TimeZone};
use std::fmt;

/// Longest draft the compose box accepts, in characters.
pub const MAX_MESSAGE_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayLabel {
    Today,
    Yesterday,
    Date(NaiveDate),
}

impl DayLabel {
    pub fn for_day(day: NaiveDate, today: NaiveDate) -> Self {
        if day == today {
            DayLabel::Today
        } else if today.checked_sub_days(Days::new(1)) == Some(day) {
            DayLabel::Yesterday
        } else {
            DayLabel::Date(day)
        }
    }
}

impl fmt::Display for DayLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayLabel::Today => f.write_str("Today"),
            DayLabel::Yesterday => f.write_str("Yesterday"),
            DayLabel::Date(day) => f.write_str(&format_day(*day)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry<'a> {
    /// Set on the first message of each calendar day.
    pub separator: Option<DayLabel>,
    pub message: &'a ChatMessage,
    pub own: bool,
    pub time: String,
}

impl TimelineEntry<'_> {
    /// Author shown above the bubble; omitted for the viewer's own messages.
    pub fn author(&self) -> Option<&str> {
        (!self.own).then_some(self.message.author_name.as_str())
    }
}

/// Lays out `messages` for `viewer`, with days and times in `now`'s zone.
pub fn timeline<'a, Tz: TimeZone>(
    messages: &'a [ChatMessage],
    viewer: &UserRecord,
    now: &DateTime<Tz>,
) -> Vec<TimelineEntry<'a>>
where
    Tz::Offset: fmt::Display,
{
    let zone = now.timezone();
    let today = now.date_naive();
    let mut previous: Option<DayLabel> = None;

    messages
        .iter()
        .map(|message| {
            let local = message.sent_at.with_timezone(&zone);
            let label = DayLabel::for_day(local.date_naive(), today);
            let separator = (previous != Some(label)).then_some(label);
            previous = Some(label);
            TimelineEntry {
                separator,
                message,
                own: message.author_id == viewer.id,
                time: format_time(&local),
            }
        })
        .collect()
}

/// "1 message", "3 messages".
pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 message".to_string()
    } else {
        format!("{count} messages")
    }
}

/// The "n/500" counter under the compose box.
pub fn draft_counter(draft: &str) -> String {
    format!("{}/{}", draft.chars().count(), MAX_MESSAGE_CHARS)
}

pub fn exceeds_limit(draft: &str) -> bool {
    draft.chars().count() > MAX_MESSAGE_CHARS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;
    use chrono::Utc;

    fn user(id: i64, name: &str) -> UserRecord {
        UserRecord {
            id,
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            gender: Gender::Other,
            date_of_birth: NaiveDate::from_ymd_opt(1995, 1, 1).unwrap(),
            password: "hunter22".into(),
            registered_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn message(id: i64, author: &UserRecord, at: DateTime<Utc>) -> ChatMessage {
        ChatMessage {
            id,
            text: format!("message {id}"),
            author_id: author.id,
            author_name: author.name.clone(),
            sent_at: at,
        }
    }

    #[test]
    fn separators_mark_each_new_day() {
        let me = user(1, "Jane");
        let other = user(2, "Sam");
        let history = vec![
            message(10, &other, Utc.with_ymd_and_hms(2023, 4, 10, 9, 0, 0).unwrap()),
            message(11, &me, Utc.with_ymd_and_hms(2023, 4, 14, 18, 5, 0).unwrap()),
            message(12, &other, Utc.with_ymd_and_hms(2023, 4, 14, 19, 0, 0).unwrap()),
            message(13, &me, Utc.with_ymd_and_hms(2023, 4, 15, 8, 0, 0).unwrap()),
        ];
        let now = Utc.with_ymd_and_hms(2023, 4, 15, 12, 0, 0).unwrap();

        let entries = timeline(&history, &me, &now);
        let separators: Vec<Option<String>> = entries
            .iter()
            .map(|e| e.separator.map(|s| s.to_string()))
            .collect();
        assert_eq!(
            separators,
            vec![
                Some("4/10/2023".to_string()),
                Some("Yesterday".to_string()),
                None,
                Some("Today".to_string()),
            ]
        );

        assert_eq!(entries[0].author(), Some("Sam"));
        assert!(entries[1].own);
        assert_eq!(entries[1].author(), None);
        assert_eq!(entries[1].time, "18:05");
    }

    #[test]
    fn counters() {
        assert_eq!(count_label(0), "0 messages");
        assert_eq!(count_label(1), "1 message");
        assert_eq!(draft_counter("héllo"), "5/500");
        assert!(!exceeds_limit(&"a".repeat(500)));
        assert!(exceeds_limit(&"a".repeat(501)));
    }
}
