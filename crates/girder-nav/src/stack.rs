//! The navigation stack.

use girder_storage::ProjectSummary;

use crate::screen::Screen;

/// Parameter bag attached to a frame (e.g. the id of the RFI to open).
pub type Params = serde_json::Map<String, serde_json::Value>;

/// One entry in the navigation stack.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub screen: Screen,
    pub params: Params,
    /// Project context the screen is bound to, if any.
    pub project: Option<ProjectSummary>,
}

impl Frame {
    /// A frame with no parameters and no bound project.
    pub fn new(screen: Screen) -> Self {
        Self {
            screen,
            params: Params::new(),
            project: None,
        }
    }

    pub fn with_params(screen: Screen, params: Params) -> Self {
        Self {
            screen,
            params,
            project: None,
        }
    }

    /// The home frame for a project.
    pub fn project_home(project: ProjectSummary) -> Self {
        Self {
            screen: Screen::ProjectHome,
            params: Params::new(),
            project: Some(project),
        }
    }
}

/// Whether [`NavigationStack::set_navigation`] preserves history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetMode {
    /// Append the frames, keeping back-history.
    Push,
    /// Swap the entire stack, discarding back-history.
    Replace,
}

/// Ordered stack of frames; the last element is the current screen.
///
/// Empty only before the session is routed. All the named operations keep
/// the stack non-empty once it has been seeded: `go_back` below one frame is
/// a no-op, and the replace-style operations always install at least one
/// frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NavigationStack {
    frames: Vec<Frame>,
}

impl NavigationStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// The single mutation primitive. Push appends; Replace swaps the whole
    /// stack. The named helpers below are thin callers: whether history is
    /// preserved and how many frames are seeded are the only two things that
    /// distinguish them.
    pub fn set_navigation(&mut self, frames: Vec<Frame>, mode: SetMode) {
        match mode {
            SetMode::Push => self.frames.extend(frames),
            SetMode::Replace => self.frames = frames,
        }
    }

    /// Push a new frame.
    pub fn navigate_to(&mut self, screen: Screen, params: Params, project: Option<ProjectSummary>) {
        self.set_navigation(
            vec![Frame {
                screen,
                params,
                project,
            }],
            SetMode::Push,
        );
    }

    /// Top-level module switch: replace the stack with a single unbound
    /// frame, explicitly discarding back-history.
    pub fn navigate_to_module(&mut self, screen: Screen, params: Params) {
        self.set_navigation(vec![Frame::with_params(screen, params)], SetMode::Replace);
    }

    /// Pop the current frame iff more than one remains; never empties the
    /// stack.
    pub fn go_back(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Return "home".
    ///
    /// With a bound project this keeps the *original first frame* (whatever
    /// the user started on, not the module-level screen) and lands on the
    /// project's home on top of it. Without a project, reset to the global
    /// dashboard.
    pub fn go_home(&mut self, current_project: Option<&ProjectSummary>) {
        match current_project {
            Some(project) => {
                let mut frames = Vec::with_capacity(2);
                if let Some(first) = self.frames.first() {
                    frames.push(first.clone());
                }
                frames.push(Frame::project_home(project.clone()));
                self.set_navigation(frames, SetMode::Replace);
            }
            None => {
                self.set_navigation(vec![Frame::new(Screen::GlobalDashboard)], SetMode::Replace);
            }
        }
    }

    /// Enter a project: replace the stack with its home frame.
    pub fn select_project(&mut self, project: ProjectSummary) {
        self.set_navigation(vec![Frame::project_home(project)], SetMode::Replace);
    }

    /// The current frame (last element), if any.
    pub fn current(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drop all frames (sign-out).
    pub(crate) fn clear(&mut self) {
        self.frames.clear();
    }
}
