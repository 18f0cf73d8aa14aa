//! Dispatch and motion simulation for a bank of elevators.
//!
//! Elevator units, a dispatcher and the request intake share one
//! [`shared::SchedulingState`] behind a single lock; see [`simulation::Simulation`]
//! for wiring them together.

/* Modules */
pub mod config;
pub mod console;
pub mod dispatcher;
pub mod elevator;
pub mod error;
pub mod intake;
pub mod shared;
pub mod simulation;

#[cfg(test)]
mod test_utils;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use intake::{PressOutcome, RequestIntake};
pub use shared::{AssignmentState, Behaviour, Direction, SharedState, Snapshot};
pub use simulation::Simulation;
