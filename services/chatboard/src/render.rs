//! services/chatboard/src/render.rs
//!
//! Plain-text renderings of each view for the terminal.

use chatboard_core::chat_view::{count_label, timeline};
use chatboard_core::{ChatMessage, ProfileView, UserRecord, ValidationErrors, View};
use chrono::{DateTime, TimeZone};
use std::fmt::{Display, Write};

pub const APP_NAME: &str = "Simple Chat";

/// The navigation bar: what a visitor can reach from here.
pub fn nav(session: Option<&UserRecord>) -> String {
    match session {
        Some(user) => format!(
            "{APP_NAME} | /about | /chat | /profile | signed in as {} (logout)",
            user.name
        ),
        None => format!("{APP_NAME} | /about | /login | /register"),
    }
}

pub fn about() -> String {
    format!(
        "{APP_NAME}\n\n\
         Register, log in, and talk with everyone who shares this storage profile.\n\n\
         Features:\n  \
         - User registration and authentication\n  \
         - A shared message board\n  \
         - User profile\n  \
         - Local data storage\n"
    )
}

pub fn login_form() -> String {
    "Login\n  chatboard login --email <email> --password <password>\n\n\
     Don't have an account? Register with `chatboard register`."
        .to_string()
}

pub fn register_form() -> String {
    "Register\n  chatboard register --name <name> --email <email> --gender <male|female|other> \
     --dob <YYYY-MM-DD> --password <password>\n\n\
     Already have an account? Log in with `chatboard login`."
        .to_string()
}

pub fn redirect(to: View) -> String {
    format!("Redirecting to {to}")
}

/// One line per failing field, in form order.
pub fn field_errors(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn profile(view: &ProfileView) -> String {
    let rows = view.rows();
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let mut out = String::from("User Profile\n");
    for (label, value) in rows {
        let _ = writeln!(out, "  {label:<width$}  {value}");
    }
    out
}

pub fn chat<Tz: TimeZone>(messages: &[ChatMessage], viewer: &UserRecord, now: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    let mut out = format!(
        "Simple Chat Room\n{} | Active user: {}\n",
        count_label(messages.len()),
        viewer.name
    );

    if messages.is_empty() {
        out.push_str("\nNo messages yet\nStart the conversation by sending a message!\n");
        return out;
    }

    for entry in timeline(messages, viewer, now) {
        if let Some(day) = entry.separator {
            let _ = writeln!(out, "\n--- {day} ---");
        }
        match entry.author() {
            Some(author) => {
                let _ = writeln!(out, "  [{}] {}: {}", entry.time, author, entry.message.text);
            }
            None => {
                let _ = writeln!(out, "> [{}] {}", entry.time, entry.message.text);
            }
        }
    }
    out
}
