//! # Navbench
//!
//! Procedurally generated grid-navigation benchmarks for reinforcement
//! learning.
//!
//! Every task variant produces a layout guaranteed solvable within its step
//! budget, places agent, target, and hazard cells (optionally re-randomized
//! per episode) without breaking solvability, and runs episodes as a
//! deterministic state machine that turns raw transitions into shaped
//! rewards, termination reasons, and truncation.
//!
//! ## Quick Start
//!
//! ```rust
//! use navbench::config::Options;
//! use navbench::env::maze::GridMaze;
//!
//! let mut env = GridMaze::new(7, Options::default()).unwrap();
//! let (observation, _info) = env.reset(Some(42)).unwrap();
//! let result = env.step(1).unwrap(); // move right
//! assert!(!result.terminated);
//! # let _ = observation;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Task configuration, reward magnitudes, and naming
pub mod config;

/// Error taxonomy
pub mod error;

/// Grid layouts: representation, generation, validation, and placement
pub mod grid;

/// Episode control and the built-in task variants
pub mod env;

pub use config::{Options, RandomKey, RewardConfig};
pub use error::Error;

/// Current version of navbench
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
