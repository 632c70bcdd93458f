//! Session and authentication core for the Postboard client.
//!
//! This crate provides:
//! - Session state with pure transitions and a shared, observable container
//! - An explicit FSM-based auth flow controller with last-intent-wins logins
//! - An HTTP wrapper that attaches the bearer token and logs out on 401
//! - Typed clients for the auth and posts endpoints

mod api;
mod auth_fsm;
mod context;
mod controller;
mod error;
mod http;
mod model;
mod posts;
mod state;
mod store;

pub use api::AuthApi;
pub use auth_fsm::session_machine;
pub use auth_fsm::{AuthPhase, SessionMachine, SessionMachineInput, SessionMachineState};
pub use context::SessionContext;
pub use controller::{AuthFlowController, LoginOutcome, LOGIN_FAILED_FALLBACK};
pub use error::{AuthError, AuthResult};
pub use http::{ApiClient, AuthorizationSource};
pub use model::{LoginRequest, LoginResponse, RefreshResponse, Role, UserProfile};
pub use posts::{Post, PostsApi, LOAD_POSTS_FALLBACK};
pub use state::{SessionAction, SessionState};
pub use store::{LoginTicket, SessionStore};
