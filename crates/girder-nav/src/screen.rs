//! Screen identifiers.

/// A navigable screen.
///
/// The navigation layer does not validate screens against a known set:
/// unrecognized ids are carried through as [`Screen::Other`] and the
/// rendering layer falls back to a placeholder for them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    GlobalDashboard,
    CompanyAdminDashboard,
    DeveloperDashboard,
    SuperAdminDashboard,
    Projects,
    ProjectHome,
    MyDay,
    Tasks,
    TaskDetail,
    DailyLog,
    Photos,
    Rfis,
    RfiDetail,
    PunchList,
    Drawings,
    DayworkSheets,
    Documents,
    TimeTracking,
    Accounting,
    /// A screen id this layer doesn't know about; passed through untouched.
    Other(String),
}

impl Screen {
    pub fn as_str(&self) -> &str {
        match self {
            Screen::GlobalDashboard => "global-dashboard",
            Screen::CompanyAdminDashboard => "company-admin-dashboard",
            Screen::DeveloperDashboard => "developer-dashboard",
            Screen::SuperAdminDashboard => "super-admin-dashboard",
            Screen::Projects => "projects",
            Screen::ProjectHome => "project-home",
            Screen::MyDay => "my-day",
            Screen::Tasks => "tasks",
            Screen::TaskDetail => "task-detail",
            Screen::DailyLog => "daily-log",
            Screen::Photos => "photos",
            Screen::Rfis => "rfis",
            Screen::RfiDetail => "rfi-detail",
            Screen::PunchList => "punch-list",
            Screen::Drawings => "drawings",
            Screen::DayworkSheets => "daywork-sheets",
            Screen::Documents => "documents",
            Screen::TimeTracking => "time-tracking",
            Screen::Accounting => "accounting",
            Screen::Other(id) => id,
        }
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for Screen {
    fn from(id: &str) -> Self {
        match id {
            "global-dashboard" => Screen::GlobalDashboard,
            "company-admin-dashboard" => Screen::CompanyAdminDashboard,
            "developer-dashboard" => Screen::DeveloperDashboard,
            "super-admin-dashboard" => Screen::SuperAdminDashboard,
            "projects" => Screen::Projects,
            "project-home" => Screen::ProjectHome,
            "my-day" => Screen::MyDay,
            "tasks" => Screen::Tasks,
            "task-detail" => Screen::TaskDetail,
            "daily-log" => Screen::DailyLog,
            "photos" => Screen::Photos,
            "rfis" => Screen::Rfis,
            "rfi-detail" => Screen::RfiDetail,
            "punch-list" => Screen::PunchList,
            "drawings" => Screen::Drawings,
            "daywork-sheets" => Screen::DayworkSheets,
            "documents" => Screen::Documents,
            "time-tracking" => Screen::TimeTracking,
            "accounting" => Screen::Accounting,
            other => Screen::Other(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_screens_roundtrip() {
        for screen in [
            Screen::GlobalDashboard,
            Screen::DeveloperDashboard,
            Screen::SuperAdminDashboard,
            Screen::ProjectHome,
            Screen::Rfis,
            Screen::DayworkSheets,
        ] {
            assert_eq!(Screen::from(screen.as_str()), screen);
        }
    }

    #[test]
    fn test_unknown_screen_passes_through() {
        let screen = Screen::from("drawing-comparison");
        assert_eq!(screen, Screen::Other("drawing-comparison".to_string()));
        assert_eq!(screen.as_str(), "drawing-comparison");
        assert_eq!(screen.to_string(), "drawing-comparison");
    }
}
