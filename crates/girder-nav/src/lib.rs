//! In-memory navigation core for girder.
//!
//! Models the client-side navigation state of the application: a stack of
//! frames (screen + parameters + optional bound project), deep-link
//! resolution that establishes project context before a target screen, the
//! role → default-screen mapping, and the session lifecycle that seeds the
//! first frame exactly once per login.
//!
//! Everything here is synchronous, single-owner state driven through
//! `&mut`; it mirrors a UI event loop, not a shared service. Nothing
//! persists: a reload re-derives the default frame from the user's role.

mod deeplink;
mod routing;
mod screen;
mod session;
mod stack;

pub use routing::default_screen_for;
pub use screen::Screen;
pub use session::{AuthenticatedUser, Session, SessionPhase};
pub use stack::{Frame, NavigationStack, Params, SetMode};
