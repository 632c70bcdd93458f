//! Process-wide session container.
//!
//! Owns the [`SessionState`], the controller phase and the login generation.
//! All three change together under one lock, and observers get the new state
//! through a `watch` channel, so nobody ever sees a half-applied transition.
//!
//! Last intent wins: every login and every logout bumps the generation, and a
//! login completion only commits while its ticket is still current.

use crate::auth_fsm::{AuthPhase, SessionMachine, SessionMachineInput};
use crate::model::{LoginRequest, UserProfile};
use crate::state::{SessionAction, SessionState};
use crate::{AuthError, AuthResult};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Identifies one login intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginTicket(u64);

impl LoginTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

struct Inner {
    generation: u64,
    machine: SessionMachine,
}

impl Inner {
    fn phase(&self) -> AuthPhase {
        AuthPhase::from(self.machine.state())
    }

    fn transition(&mut self, input: &SessionMachineInput) -> AuthResult<AuthPhase> {
        let old_phase = self.phase();

        self.machine.consume(input).map_err(|_| {
            AuthError::InvalidStateTransition(format!(
                "Cannot apply {:?} in state {:?}",
                input,
                self.machine.state()
            ))
        })?;

        let new_phase = self.phase();
        if old_phase != new_phase {
            debug!(
                old_phase = %old_phase,
                new_phase = %new_phase,
                "Auth phase transition"
            );
        }
        Ok(new_phase)
    }
}

/// Session state container shared by the controller and the HTTP wrapper.
pub struct SessionStore {
    inner: Mutex<Inner>,
    state_tx: watch::Sender<SessionState>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        let (state_tx, _) = watch::channel(SessionState::default());
        Self {
            inner: Mutex::new(Inner {
                generation: 0,
                machine: SessionMachine::new(),
            }),
            state_tx,
        }
    }

    /// Current state.
    pub fn snapshot(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Receive every committed state.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Current controller phase.
    pub fn phase(&self) -> AuthPhase {
        self.inner.lock().phase()
    }

    /// Ticket for the current generation, for work that must be dropped if
    /// any login or logout happens before it completes.
    pub fn current_ticket(&self) -> LoginTicket {
        LoginTicket(self.inner.lock().generation)
    }

    /// Whether no login or logout happened since `ticket` was issued.
    pub fn is_current(&self, ticket: LoginTicket) -> bool {
        self.inner.lock().generation == ticket.0
    }

    fn emit(&self, action: SessionAction) {
        self.state_tx.send_modify(|state| state.apply(action));
    }

    /// Start a login. Supersedes any login in flight.
    pub fn begin_login(&self, request: &LoginRequest) -> LoginTicket {
        let mut inner = self.inner.lock();
        inner.generation += 1;
        if let Err(e) = inner.transition(&SessionMachineInput::LoginRequested) {
            warn!(error = %e, "Login requested in unexpected phase");
        }
        self.emit(SessionAction::LoginRequested(request.clone()));
        LoginTicket(inner.generation)
    }

    /// Commit a successful login if `ticket` is still current.
    ///
    /// `persist` runs under the container lock right before the state changes,
    /// so a newer login or a logout cannot interleave with it.
    pub fn succeed_login(
        &self,
        ticket: LoginTicket,
        user: UserProfile,
        access_token: String,
        persist: impl FnOnce(),
    ) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != ticket.0 {
            debug!(
                ticket = ticket.0,
                current = inner.generation,
                "Discarding superseded login success"
            );
            return false;
        }
        if let Err(e) = inner.transition(&SessionMachineInput::LoginSucceeded) {
            warn!(error = %e, "Dropping login success");
            return false;
        }
        persist();
        info!(user_id = %user.id, "Login succeeded");
        self.emit(SessionAction::LoginSucceeded { user, access_token });
        true
    }

    /// Record a failed login if `ticket` is still current.
    pub fn fail_login(&self, ticket: LoginTicket, message: String) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != ticket.0 {
            debug!(
                ticket = ticket.0,
                current = inner.generation,
                "Discarding superseded login failure"
            );
            return false;
        }
        if let Err(e) = inner.transition(&SessionMachineInput::LoginFailed) {
            warn!(error = %e, "Dropping login failure");
            return false;
        }
        info!(error = %message, "Login failed");
        self.emit(SessionAction::LoginFailed(message));
        true
    }

    /// Adopt a previously persisted session if nothing happened since `ticket`.
    pub fn restore(&self, ticket: LoginTicket, user: UserProfile, access_token: String) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != ticket.0 {
            debug!("Discarding restored session, a newer intent exists");
            return false;
        }
        if let Err(e) = inner.transition(&SessionMachineInput::SessionRestored) {
            debug!(error = %e, "Not restoring session");
            return false;
        }
        info!(user_id = %user.id, "Session restored");
        self.emit(SessionAction::LoginSucceeded { user, access_token });
        true
    }

    /// Reset to the logged-out state and invalidate any login in flight.
    ///
    /// `clear` runs under the container lock before the state resets.
    pub fn logout(&self, clear: impl FnOnce()) {
        let mut inner = self.inner.lock();
        self.reset(&mut inner, clear);
    }

    fn reset(&self, inner: &mut Inner, clear: impl FnOnce()) {
        inner.generation += 1;
        if let Err(e) = inner.transition(&SessionMachineInput::LogoutRequested) {
            warn!(error = %e, "Resetting auth phase");
            inner.machine = SessionMachine::new();
        }
        clear();
        self.emit(SessionAction::LoggedOut);
    }

    /// Like [`logout`](Self::logout), but only if no login or logout happened
    /// since `ticket` was issued.
    pub fn logout_if_current(&self, ticket: LoginTicket, clear: impl FnOnce()) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != ticket.0 {
            debug!("Keeping session, a newer intent exists");
            return false;
        }
        self.reset(&mut inner, clear);
        true
    }

    /// Replace the current user's profile. Ignored unless the session holds
    /// a user and a token, which a failed re-login leaves in place.
    pub fn set_user(&self, user: UserProfile) -> bool {
        let _inner = self.inner.lock();
        if !self.state_tx.borrow().is_authenticated() {
            debug!("Ignoring profile update without a session");
            return false;
        }
        self.emit(SessionAction::UserLoaded(user));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn request() -> LoginRequest {
        LoginRequest::new("a@b.c", "pw")
    }

    fn user(id: &str) -> UserProfile {
        UserProfile::new(id, format!("{id}@b.c"))
    }

    #[test]
    fn test_login_success_commits() {
        let store = SessionStore::new();
        let ticket = store.begin_login(&request());
        assert!(store.snapshot().loading());
        assert_eq!(store.phase(), AuthPhase::LoggingIn);

        let persisted = Cell::new(false);
        assert!(store.succeed_login(ticket, user("1"), "tok1".to_string(), || {
            persisted.set(true)
        }));

        assert!(persisted.get());
        let state = store.snapshot();
        assert_eq!(state.access_token(), Some("tok1"));
        assert!(!state.loading());
        assert_eq!(store.phase(), AuthPhase::Authenticated);
    }

    #[test]
    fn test_superseded_login_is_discarded() {
        let store = SessionStore::new();
        let first = store.begin_login(&request());
        let second = store.begin_login(&request());

        assert!(store.succeed_login(second, user("2"), "tok2".to_string(), || {}));

        let persisted = Cell::new(false);
        assert!(!store.succeed_login(first, user("1"), "tok1".to_string(), || {
            persisted.set(true)
        }));
        assert!(!persisted.get());
        assert!(!store.fail_login(first, "late".to_string()));

        let state = store.snapshot();
        assert_eq!(state.access_token(), Some("tok2"));
        assert!(state.error().is_none());
    }

    #[test]
    fn test_logout_invalidates_login_in_flight() {
        let store = SessionStore::new();
        let ticket = store.begin_login(&request());

        store.logout(|| {});
        assert!(!store.is_current(ticket));
        assert!(!store.succeed_login(ticket, user("1"), "tok1".to_string(), || {}));

        assert_eq!(store.snapshot(), SessionState::default());
        assert_eq!(store.phase(), AuthPhase::Idle);
    }

    #[test]
    fn test_failure_then_retry() {
        let store = SessionStore::new();
        let ticket = store.begin_login(&request());
        assert!(store.fail_login(ticket, "invalid credentials".to_string()));
        assert_eq!(store.phase(), AuthPhase::LoginFailed);
        assert_eq!(store.snapshot().error(), Some("invalid credentials"));

        let retry = store.begin_login(&request());
        assert_eq!(store.phase(), AuthPhase::LoggingIn);
        assert!(store.snapshot().error().is_none());
        assert!(store.succeed_login(retry, user("1"), "tok1".to_string(), || {}));
    }

    #[test]
    fn test_restore_only_when_nothing_happened() {
        let store = SessionStore::new();
        let stale = store.current_ticket();
        store.begin_login(&request());
        assert!(!store.restore(stale, user("1"), "tok1".to_string()));

        let store = SessionStore::new();
        let ticket = store.current_ticket();
        assert!(store.restore(ticket, user("1"), "tok1".to_string()));
        assert!(store.snapshot().is_authenticated());
        assert_eq!(store.phase(), AuthPhase::Authenticated);
    }

    #[test]
    fn test_set_user_requires_session() {
        let store = SessionStore::new();
        assert!(!store.set_user(user("1")));
        assert!(store.snapshot().user().is_none());

        let ticket = store.begin_login(&request());
        store.succeed_login(ticket, user("1"), "tok1".to_string(), || {});
        let mut renamed = user("1");
        renamed.name = Some("Ada".to_string());
        assert!(store.set_user(renamed));
        assert_eq!(
            store.snapshot().user().and_then(|u| u.name.as_deref()),
            Some("Ada")
        );
    }

    #[test]
    fn test_set_user_after_failed_relogin() {
        let store = SessionStore::new();
        let ticket = store.begin_login(&request());
        store.succeed_login(ticket, user("1"), "tok1".to_string(), || {});
        let retry = store.begin_login(&request());
        store.fail_login(retry, "invalid credentials".to_string());
        assert_eq!(store.phase(), AuthPhase::LoginFailed);
        assert!(store.snapshot().is_authenticated());

        let mut renamed = user("1");
        renamed.name = Some("Ada".to_string());
        assert!(store.set_user(renamed));
        assert_eq!(store.snapshot().error(), Some("invalid credentials"));
    }

    #[test]
    fn test_logout_if_current_respects_newer_intent() {
        let store = SessionStore::new();
        let stale = store.current_ticket();
        let ticket = store.begin_login(&request());

        let cleared = Cell::new(false);
        assert!(!store.logout_if_current(stale, || cleared.set(true)));
        assert!(!cleared.get());
        assert!(store.is_current(ticket));
        assert!(store.snapshot().loading());

        assert!(store.logout_if_current(ticket, || cleared.set(true)));
        assert!(cleared.get());
        assert!(!store.is_current(ticket));
        assert_eq!(store.snapshot(), SessionState::default());
    }

    #[test]
    fn test_logout_twice_equals_once() {
        let store = SessionStore::new();
        let ticket = store.begin_login(&request());
        store.succeed_login(ticket, user("1"), "tok1".to_string(), || {});

        store.logout(|| {});
        let once = store.snapshot();
        store.logout(|| {});
        assert_eq!(store.snapshot(), once);
        assert_eq!(once, SessionState::default());
    }

    #[tokio::test]
    async fn test_subscribers_see_committed_states() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        let ticket = store.begin_login(&request());
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().loading());

        store.fail_login(ticket, "nope".to_string());
        rx.changed().await.unwrap();
        let state = rx.borrow_and_update().clone();
        assert_eq!(state.error(), Some("nope"));
        assert!(!state.loading());
    }
}
