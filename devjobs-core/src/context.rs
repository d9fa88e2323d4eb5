//! Session and user data shared between pages
//!
//! Pages receive an [`AppContext`] explicitly and change it only through
//! [`AppContext::dispatch`].

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::models::{BasicUserProfile, DashboardSummary, Session, UserProfile};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub session: Option<Session>,
    pub basic_profile: Option<BasicUserProfile>,
    pub full_profile: Option<UserProfile>,
    /// Last employer dashboard summary.
    pub notifications: Option<DashboardSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetSession(Session),
    SetBasicProfile(BasicUserProfile),
    SetFullProfile(UserProfile),
    SetNotifications(DashboardSummary),
    LogOut,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::SetSession(_) => "set_session",
            Action::SetBasicProfile(_) => "set_basic_profile",
            Action::SetFullProfile(_) => "set_full_profile",
            Action::SetNotifications(_) => "set_notifications",
            Action::LogOut => "log_out",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppContext {
    inner: Arc<RwLock<UserState>>,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Option<Session>) -> Self {
        let ctx = Self::new();
        if let Some(session) = session {
            ctx.dispatch(Action::SetSession(session));
        }
        ctx
    }

    fn read(&self) -> RwLockReadGuard<'_, UserState> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, UserState> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn dispatch(&self, action: Action) {
        debug!(action = action.name(), "context dispatch");
        let mut state = self.write();
        match action {
            Action::SetSession(session) => state.session = Some(session),
            Action::SetBasicProfile(profile) => state.basic_profile = Some(profile),
            Action::SetFullProfile(profile) => state.full_profile = Some(profile),
            Action::SetNotifications(summary) => state.notifications = Some(summary),
            Action::LogOut => *state = UserState::default(),
        }
    }

    pub fn snapshot(&self) -> UserState {
        self.read().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.read().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().session.is_some()
    }

    pub fn basic_profile(&self) -> Option<BasicUserProfile> {
        self.read().basic_profile.clone()
    }

    pub fn full_profile(&self) -> Option<UserProfile> {
        self.read().full_profile.clone()
    }

    pub fn notifications(&self) -> Option<DashboardSummary> {
        self.read().notifications.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountKind, AuthToken};

    fn session() -> Session {
        Session::new(
            AuthToken {
                key: "abc".into(),
            },
            AccountKind::Employer,
        )
    }

    #[test]
    fn clones_share_state() {
        let ctx = AppContext::new();
        let other = ctx.clone();
        ctx.dispatch(Action::SetSession(session()));
        assert!(other.is_authenticated());
        assert_eq!(other.session().map(|s| s.authorization()), Some("Token abc".into()));
    }

    #[test]
    fn log_out_clears_everything() {
        let ctx = AppContext::with_session(Some(session()));
        ctx.dispatch(Action::SetNotifications(DashboardSummary::default()));
        ctx.dispatch(Action::SetBasicProfile(BasicUserProfile {
            username: "ada".into(),
            ..Default::default()
        }));
        ctx.dispatch(Action::LogOut);
        assert_eq!(ctx.snapshot(), UserState::default());
    }
}
