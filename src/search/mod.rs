//! Incremental search/selection layer.
//!
//! This module turns keystrokes into a live, race-free candidate list and a
//! single committed selection:
//!
//! - **[`debounce`]**: settle-interval timer in front of the lookup.
//! - **[`session`]**: generation-stamped result session (stale responses are dropped).
//! - **[`selector`]**: highlight state machine for keyboard and pointer events.
//! - **[`controller`]**: the search bar itself; composes the above and owns the commit protocol.
//! - **[`driver`]**: runs the controller's effects on tokio and feeds results back.

pub mod controller;
pub mod debounce;
pub mod driver;
pub mod selector;
pub mod session;

pub use controller::{Effect, Handled, ResolveTicket, SearchBar};
pub use driver::{Navigator, RecentSink, SearchDriver};
pub use selector::NavEvent;
pub use session::{Completion, LookupTicket, SearchSession};
