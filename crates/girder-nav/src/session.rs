//! Session lifecycle.
//!
//! The lifecycle is an explicit state machine, and the one-shot initial
//! navigation hangs off the single transition into `Routed`. Re-routing
//! while already routed is a no-op, so incidental re-evaluation of session
//! state can never reset the user's stack.

use girder_storage::{CompanyId, Role, UserId};

use crate::routing::default_screen_for;
use crate::stack::{NavigationStack, Params};

/// The already-authenticated user object consumed from the surrounding
/// application. The navigation core never authenticates anyone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub role: Role,
    pub company_id: CompanyId,
}

/// Where the session is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Unauthenticated,
    /// A stored session is being restored; no navigation stack exists yet.
    Restoring,
    /// Logged in and routed to an initial frame.
    Routed,
}

/// Session state machine driving one-shot initial navigation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    phase: SessionPhase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Mark that a stored session is being restored. Only meaningful from
    /// `Unauthenticated`; returns whether the transition happened.
    pub fn begin_restore(&mut self) -> bool {
        if self.phase == SessionPhase::Unauthenticated {
            self.phase = SessionPhase::Restoring;
            true
        } else {
            false
        }
    }

    /// Route the user to their role's landing screen.
    ///
    /// Fires at most once per login session: only the transition into
    /// `Routed` seeds the stack. Returns whether navigation happened.
    pub fn route(&mut self, user: &AuthenticatedUser, nav: &mut NavigationStack) -> bool {
        if self.phase == SessionPhase::Routed {
            return false;
        }
        nav.navigate_to_module(default_screen_for(user.role), Params::new());
        self.phase = SessionPhase::Routed;
        true
    }

    /// End the session: back to `Unauthenticated` with an empty stack.
    pub fn sign_out(&mut self, nav: &mut NavigationStack) {
        self.phase = SessionPhase::Unauthenticated;
        nav.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::Screen;
    use uuid::Uuid;

    fn user(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId(Uuid::new_v4()),
            role,
            company_id: CompanyId(Uuid::new_v4()),
        }
    }

    #[test]
    fn test_route_seeds_default_screen_once() {
        let mut session = Session::new();
        let mut nav = NavigationStack::new();
        let dev = user(Role::Developer);

        assert!(session.route(&dev, &mut nav));
        assert_eq!(session.phase(), SessionPhase::Routed);
        assert_eq!(nav.len(), 1);
        assert_eq!(nav.current().unwrap().screen, Screen::DeveloperDashboard);

        // The user navigates away; a re-render must not reset them.
        nav.navigate_to(Screen::Projects, Params::new(), None);
        assert!(!session.route(&dev, &mut nav));
        assert_eq!(nav.len(), 2);
        assert_eq!(nav.current().unwrap().screen, Screen::Projects);
    }

    #[test]
    fn test_route_from_restoring() {
        let mut session = Session::new();
        let mut nav = NavigationStack::new();

        assert!(session.begin_restore());
        assert_eq!(session.phase(), SessionPhase::Restoring);

        let operative = user(Role::Operative);
        assert!(session.route(&operative, &mut nav));
        assert_eq!(nav.current().unwrap().screen, Screen::GlobalDashboard);
    }

    #[test]
    fn test_begin_restore_only_from_unauthenticated() {
        let mut session = Session::new();
        let mut nav = NavigationStack::new();
        session.route(&user(Role::Supervisor), &mut nav);

        assert!(!session.begin_restore());
        assert_eq!(session.phase(), SessionPhase::Routed);
    }

    #[test]
    fn test_sign_out_then_login_routes_again() {
        let mut session = Session::new();
        let mut nav = NavigationStack::new();
        let admin = user(Role::SuperAdmin);

        session.route(&admin, &mut nav);
        session.sign_out(&mut nav);
        assert_eq!(session.phase(), SessionPhase::Unauthenticated);
        assert!(nav.is_empty());

        // A fresh login is a fresh one-shot.
        assert!(session.route(&admin, &mut nav));
        assert_eq!(nav.current().unwrap().screen, Screen::SuperAdminDashboard);
    }
}
