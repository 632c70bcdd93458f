//! Auth flow state machine using rust-fsm.
//!
//! ## State Diagram
//!
//! ```text
//!                  SessionRestored
//!        ┌──────────────────────────────────────────┐
//!        │                                          ▼
//! ┌─────────────┐  LoginRequested  ┌─────────────┐  LoginSucceeded  ┌───────────────┐
//! │    Idle     │ ───────────────► │  LoggingIn  │ ───────────────► │ Authenticated │
//! └─────────────┘                  └──────┬──────┘                  └───────────────┘
//!        ▲                                │ LoginFailed                    │
//!        │                                ▼                                │
//!        │                         ┌─────────────┐                         │
//!        │                         │ LoginFailed │ ── LoginRequested ──►   │
//!        │                         └─────────────┘    (LoggingIn)          │
//!        │                                                                 │
//!        └──────────── LogoutRequested (from every state) ─────────────────┘
//! ```
//!
//! `LoginRequested` is accepted in every state: a newer login supersedes one
//! in flight, and an authenticated user may log in again.

use rust_fsm::*;
use serde::{Deserialize, Serialize};

state_machine! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub session_machine(Idle)

    Idle => {
        LoginRequested => LoggingIn,
        SessionRestored => Authenticated,
        LogoutRequested => Idle
    },
    LoggingIn => {
        LoginRequested => LoggingIn,
        LoginSucceeded => Authenticated,
        LoginFailed => LoginFailed,
        LogoutRequested => Idle
    },
    Authenticated => {
        LoginRequested => LoggingIn,
        SessionRestored => Authenticated,
        LogoutRequested => Idle
    },
    LoginFailed => {
        LoginRequested => LoggingIn,
        LogoutRequested => Idle
    }
}

pub use session_machine::Input as SessionMachineInput;
pub use session_machine::State as SessionMachineState;
pub use session_machine::StateMachine as SessionMachine;

/// Controller phase for external consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    /// No session and no login in flight.
    Idle,
    /// A login request is in flight.
    LoggingIn,
    /// Session established.
    Authenticated,
    /// Last login attempt failed.
    LoginFailed,
}

impl AuthPhase {
    /// Returns true if a session is established.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthPhase::Authenticated)
    }

    /// Returns true while a request is in flight.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthPhase::LoggingIn)
    }
}

impl From<&SessionMachineState> for AuthPhase {
    fn from(state: &SessionMachineState) -> Self {
        match state {
            SessionMachineState::Idle => AuthPhase::Idle,
            SessionMachineState::LoggingIn => AuthPhase::LoggingIn,
            SessionMachineState::Authenticated => AuthPhase::Authenticated,
            SessionMachineState::LoginFailed => AuthPhase::LoginFailed,
        }
    }
}

impl std::fmt::Display for AuthPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AuthPhase::Idle => "idle",
            AuthPhase::LoggingIn => "logging_in",
            AuthPhase::Authenticated => "authenticated",
            AuthPhase::LoginFailed => "login_failed",
        };
        f.write_str(label)
    }
}
