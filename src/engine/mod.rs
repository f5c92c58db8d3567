//! Engine controller for managing search and game state.
//!
//! Wraps the board/search collaborators behind a small controller that
//! owns the position, spawns the search thread, and reports results back
//! through callbacks, abstracting the common logic of search management,
//! pondering, and time control away from the UCI shell.

mod controller;
mod protocol;
pub mod time;

pub use controller::{EngineController, SearchJob, SearchParams};
pub use protocol::{CommandResult, Protocol};
pub use time::{build_search_request, compute_time_limits, TimeConfig, TimeControl};
