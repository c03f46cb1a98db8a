//! crates/chatboard_core/src/session_gate.rs
//!
//! Decides which view a visitor actually gets, based only on whether a
//! session is present.

use crate::domain::UserRecord;
use crate::ports::PortError;
use crate::user_store::UserStore;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Root,
    About,
    Login,
    Register,
    Chat,
    Profile,
}

impl View {
    pub fn path(&self) -> &'static str {
        match self {
            View::Root => "/",
            View::About => "/about",
            View::Login => "/login",
            View::Register => "/register",
            View::Chat => "/chat",
            View::Profile => "/profile",
        }
    }

    /// Views that need a signed-in user.
    pub fn is_protected(&self) -> bool {
        matches!(self, View::Chat | View::Profile)
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no view at '{0}'")]
pub struct UnknownRoute(pub String);

impl FromStr for View {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        let path = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);
        match path {
            "/" | "" => Ok(View::Root),
            "/about" => Ok(View::About),
            "/login" => Ok(View::Login),
            "/register" => Ok(View::Register),
            "/chat" => Ok(View::Chat),
            "/profile" => Ok(View::Profile),
            _ => Err(UnknownRoute(s.to_string())),
        }
    }
}

/// What to do with a requested view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Render the view. Carries the session, if any.
    Show(View, Option<UserRecord>),
    Redirect(View),
}

/// Pure derivation over `UserStore`; holds no state of its own.
#[derive(Clone)]
pub struct SessionGate {
    users: UserStore,
}

impl SessionGate {
    pub fn new(users: UserStore) -> Self {
        Self { users }
    }

    pub async fn is_authenticated(&self) -> Result<bool, PortError> {
        Ok(self.users.current_session().await?.is_some())
    }

    pub async fn resolve(&self, requested: View) -> Result<Access, PortError> {
        let session = self.users.current_session().await?;
        Ok(route(requested, session))
    }
}

/// The route table: `/` goes to `/about`, the auth forms bounce signed-in
/// users to `/chat`, protected views bounce anonymous visitors to `/login`.
pub fn route(requested: View, session: Option<UserRecord>) -> Access {
    match (requested, session) {
        (View::Root, _) => Access::Redirect(View::About),
        (View::Login | View::Register, Some(_)) => Access::Redirect(View::Chat),
        (view, None) if view.is_protected() => Access::Redirect(View::Login),
        (view, session) => Access::Show(view, session),
    }
}
