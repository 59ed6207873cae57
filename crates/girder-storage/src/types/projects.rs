//! Project summaries consumed by the navigation layer.

use super::ProjectId;

/// Denormalized project display data from the per-session project list.
///
/// The navigation core never fetches this itself; the surrounding
/// application loads the list once per authenticated session and hands it
/// in at deep-link time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
    pub location: String,
}
