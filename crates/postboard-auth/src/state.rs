//! Session state and its transitions.
//!
//! Every transition is total and idempotent. The only invariant that ties
//! fields together is that a recorded error implies no request in flight.

use crate::model::{LoginRequest, UserProfile};
use std::fmt;

/// Process-wide view of who is logged in.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    user: Option<UserProfile>,
    access_token: Option<String>,
    loading: bool,
    error: Option<String>,
}

/// A transition on [`SessionState`].
#[derive(Clone, PartialEq, Eq)]
pub enum SessionAction {
    LoginRequested(LoginRequest),
    LoginSucceeded {
        user: UserProfile,
        access_token: String,
    },
    LoginFailed(String),
    LoggedOut,
    UserLoaded(UserProfile),
}

impl fmt::Debug for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionAction::LoginRequested(request) => {
                f.debug_tuple("LoginRequested").field(request).finish()
            }
            SessionAction::LoginSucceeded { user, .. } => f
                .debug_struct("LoginSucceeded")
                .field("user_id", &user.id)
                .finish_non_exhaustive(),
            SessionAction::LoginFailed(message) => {
                f.debug_tuple("LoginFailed").field(message).finish()
            }
            SessionAction::LoggedOut => f.write_str("LoggedOut"),
            SessionAction::UserLoaded(user) => {
                f.debug_tuple("UserLoaded").field(&user.id).finish()
            }
        }
    }
}

impl SessionState {
    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Both a user and a token are present.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.access_token.is_some()
    }

    /// A login started: clears any previous error.
    ///
    /// The credentials are the payload of the request, not session state.
    pub fn login_requested(&mut self, _request: &LoginRequest) {
        self.loading = true;
        self.error = None;
    }

    /// A login completed. `error` is left as is; it was cleared when the
    /// login was requested.
    pub fn login_succeeded(&mut self, user: UserProfile, access_token: String) {
        self.user = Some(user);
        self.access_token = Some(access_token);
        self.loading = false;
    }

    /// A login failed. Any previous user and token are kept until an explicit logout.
    pub fn login_failed(&mut self, message: String) {
        self.error = Some(message);
        self.loading = false;
    }

    /// Reset to the empty state.
    pub fn logged_out(&mut self) {
        *self = Self::default();
    }

    /// Replace the profile of the current user.
    pub fn user_loaded(&mut self, user: UserProfile) {
        self.user = Some(user);
    }

    /// Apply a transition.
    pub fn apply(&mut self, action: SessionAction) {
        match action {
            SessionAction::LoginRequested(request) => self.login_requested(&request),
            SessionAction::LoginSucceeded { user, access_token } => {
                self.login_succeeded(user, access_token)
            }
            SessionAction::LoginFailed(message) => self.login_failed(message),
            SessionAction::LoggedOut => self.logged_out(),
            SessionAction::UserLoaded(user) => self.user_loaded(user),
        }
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState")
            .field("user", &self.user)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("loading", &self.loading)
            .field("error", &self.error)
            .finish()
    }
}
