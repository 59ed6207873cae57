//! Role-based default-screen routing.

use girder_storage::Role;

use crate::screen::Screen;

/// The landing screen for a role.
///
/// Developers and super admins get their own dashboards; every other role
/// falls through to the global dashboard. Which dashboard *component* a role
/// sees is a rendering concern and lives with the UI, not here.
pub fn default_screen_for(role: Role) -> Screen {
    match role {
        Role::Developer => Screen::DeveloperDashboard,
        Role::SuperAdmin => Screen::SuperAdminDashboard,
        _ => Screen::GlobalDashboard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapped_roles() {
        assert_eq!(
            default_screen_for(Role::Developer),
            Screen::DeveloperDashboard
        );
        assert_eq!(
            default_screen_for(Role::SuperAdmin),
            Screen::SuperAdminDashboard
        );
    }

    #[test]
    fn test_unmapped_roles_fall_through_to_global_dashboard() {
        for role in [
            Role::CompanyAdmin,
            Role::ProjectManager,
            Role::Supervisor,
            Role::Operative,
        ] {
            assert_eq!(default_screen_for(role), Screen::GlobalDashboard);
        }
    }
}
