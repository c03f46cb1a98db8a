//! services/chatboard/src/commands.rs
//!
//! The terminal front end: every subcommand first asks the session gate which
//! view it lands on, then performs its action and renders the result.

use crate::error::AppError;
use crate::render;
use crate::state::AppState;
use chatboard_core::chat_view::{draft_counter, exceeds_limit, MAX_MESSAGE_CHARS};
use chatboard_core::{
    Access, Gender, LoginError, MessageError, ProfileView, RegisterError, RegistrationForm,
    UserRecord, View,
};
use chrono::{DateTime, NaiveDate, TimeZone};
use clap::Subcommand;
use std::fmt::Display;
use tracing::debug;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create an account and sign in
    Register {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        /// male, female or other
        #[arg(long)]
        gender: Option<String>,
        /// Date of birth as YYYY-MM-DD
        #[arg(long = "dob")]
        date_of_birth: Option<String>,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Sign in with an existing account
    Login {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user's profile
    Profile,
    /// Show the message board
    Chat,
    /// Post a message to the board
    Send {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Show whatever the given route resolves to, e.g. `/chat`
    Open { route: String },
    /// About this app
    About,
}

impl Command {
    /// Subcommand name for logs; arguments may hold credentials.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Register { .. } => "register",
            Command::Login { .. } => "login",
            Command::Logout => "logout",
            Command::Profile => "profile",
            Command::Chat => "chat",
            Command::Send { .. } => "send",
            Command::Open { .. } => "open",
            Command::About => "about",
        }
    }
}

/// What a command printed, and whether it did what was asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    pub ok: bool,
}

impl Outcome {
    fn shown(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            ok: true,
        }
    }

    fn rejected(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            ok: false,
        }
    }
}

/// Runs one command against `state`, rendering dates in `now`'s zone.
pub async fn run<Tz: TimeZone>(
    state: &AppState,
    command: Command,
    now: &DateTime<Tz>,
) -> Result<Outcome, AppError>
where
    Tz::Offset: Display,
{
    debug!(command = command.name(), "running command");
    match command {
        Command::Register {
            name,
            email,
            gender,
            date_of_birth,
            password,
        } => {
            if let Access::Redirect(_) = state.gate.resolve(View::Register).await? {
                return redirected(state, View::Register, now).await;
            }
            let form = RegistrationForm {
                name,
                email,
                gender: parse_gender(gender.as_deref())?,
                date_of_birth: parse_date_of_birth(date_of_birth.as_deref())?,
                password,
            };
            match state.users.register(&form).await {
                Ok(_) => show_view(state, View::Chat, now).await,
                Err(RegisterError::Invalid(errors)) => {
                    Ok(Outcome::rejected(render::field_errors(&errors)))
                }
                Err(RegisterError::DuplicateEmail) => {
                    Ok(Outcome::rejected(RegisterError::DuplicateEmail.to_string()))
                }
                Err(RegisterError::Storage(e)) => Err(e.into()),
            }
        }
        Command::Login { email, password } => {
            if let Access::Redirect(_) = state.gate.resolve(View::Login).await? {
                return redirected(state, View::Login, now).await;
            }
            match state.users.login(&email, &password).await {
                Ok(_) => show_view(state, View::Chat, now).await,
                Err(LoginError::Storage(e)) => Err(e.into()),
                Err(rejection) => Ok(Outcome::rejected(rejection.to_string())),
            }
        }
        Command::Logout => {
            state.users.logout().await?;
            Ok(Outcome::shown(format!(
                "Logged out.\n{}",
                render::nav(None)
            )))
        }
        Command::Profile => show_view(state, View::Profile, now).await,
        Command::Chat => show_view(state, View::Chat, now).await,
        Command::Send { text } => {
            let author = match state.gate.resolve(View::Chat).await? {
                Access::Show(_, Some(user)) => user,
                Access::Show(view, None) | Access::Redirect(view) => {
                    return Ok(Outcome::rejected(render::redirect(view)))
                }
            };
            send(state, &author, &text.join(" "), now).await
        }
        Command::Open { route } => {
            let view = route
                .parse::<View>()
                .map_err(|e| AppError::Input(e.to_string()))?;
            show_view(state, view, now).await
        }
        Command::About => show_view(state, View::About, now).await,
    }
}

async fn send<Tz: TimeZone>(
    state: &AppState,
    author: &UserRecord,
    draft: &str,
    now: &DateTime<Tz>,
) -> Result<Outcome, AppError>
where
    Tz::Offset: Display,
{
    if exceeds_limit(draft) {
        return Ok(Outcome::rejected(format!(
            "Message is longer than {MAX_MESSAGE_CHARS} characters ({})",
            draft_counter(draft)
        )));
    }
    match state.messages.append(author, draft).await {
        Ok(_) => {
            let history = state.messages.load_all().await?;
            Ok(Outcome::shown(render::chat(&history, author, now)))
        }
        Err(MessageError::EmptyMessage) => {
            Ok(Outcome::rejected(MessageError::EmptyMessage.to_string()))
        }
        Err(MessageError::Storage(e)) => Err(e.into()),
    }
}

/// Shows where an action command was sent instead of performing it.
async fn redirected<Tz: TimeZone>(
    state: &AppState,
    requested: View,
    now: &DateTime<Tz>,
) -> Result<Outcome, AppError>
where
    Tz::Offset: Display,
{
    let shown = show_view(state, requested, now).await?;
    Ok(Outcome::rejected(shown.output))
}

/// Resolves `requested` through the gate, follows any redirect, and renders
/// the view that is finally shown.
async fn show_view<Tz: TimeZone>(
    state: &AppState,
    requested: View,
    now: &DateTime<Tz>,
) -> Result<Outcome, AppError>
where
    Tz::Offset: Display,
{
    let mut view = requested;
    let mut notes = Vec::new();
    // Every redirect in the route table lands on a view that is shown.
    let session = loop {
        match state.gate.resolve(view).await? {
            Access::Redirect(to) => {
                notes.push(render::redirect(to));
                view = to;
            }
            Access::Show(_, session) => break session,
        }
    };

    let body = match (view, session.as_ref()) {
        (View::Chat, Some(user)) => {
            let history = state.messages.load_all().await?;
            render::chat(&history, user, now)
        }
        (View::Profile, Some(user)) => render::profile(&ProfileView::new(user, now)),
        (View::Login, _) => render::login_form(),
        (View::Register, _) => render::register_form(),
        _ => render::about(),
    };

    let mut output = notes;
    output.push(render::nav(session.as_ref()));
    output.push(body);

    // Landing on the login form when something else was asked for means the
    // visitor was turned away.
    let ok = !(view == View::Login && requested.is_protected());
    Ok(Outcome {
        output: output.join("\n"),
        ok,
    })
}

fn parse_gender(raw: Option<&str>) -> Result<Option<Gender>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<Gender>()
            .map(Some)
            .map_err(|e| AppError::Input(e.to_string())),
    }
}

fn parse_date_of_birth(raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::Input(format!("'{value}' is not a date (expected YYYY-MM-DD)"))),
    }
}
