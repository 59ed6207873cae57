//! Deep-link resolution.
//!
//! A deep link (e.g. from a notification "new RFI on Project X") must
//! establish project context before showing the target screen, so the
//! user's back button returns to that project's home rather than to an
//! unrelated prior screen.

use girder_storage::{ProjectId, ProjectSummary};

use crate::screen::Screen;
use crate::stack::{Frame, NavigationStack, Params, SetMode};

impl NavigationStack {
    /// Resolve a deep link against the already-loaded project list (the
    /// navigation core never fetches).
    ///
    /// With a project id that resolves, the stack becomes exactly
    /// `[project-home(project), target]`, both frames bound to the project.
    /// An id absent from `known_projects` leaves the stack untouched, a
    /// silent no-op by contract. Without a project id this degrades to a
    /// plain push.
    pub fn handle_deep_link(
        &mut self,
        project_id: Option<ProjectId>,
        screen: Screen,
        params: Params,
        known_projects: &[ProjectSummary],
    ) {
        match project_id {
            Some(id) => {
                let Some(project) = known_projects.iter().find(|p| p.id == id) else {
                    return;
                };
                self.set_navigation(
                    vec![
                        Frame::project_home(project.clone()),
                        Frame {
                            screen,
                            params,
                            project: Some(project.clone()),
                        },
                    ],
                    SetMode::Replace,
                );
            }
            None => self.navigate_to(screen, params, None),
        }
    }
}
