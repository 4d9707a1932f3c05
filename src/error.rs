//! Error taxonomy for layout loading, configuration, and stepping
//!
//! Unsolvable layouts never appear here: they are an internal signal handled
//! by silent regeneration and retry. Everything below is fatal and indicates
//! either bad input or a broken board invariant.

use thiserror::Error;

use crate::config::RandomKey;
use crate::grid::Cell;

/// Errors raised by the layout engine and the episode controller.
#[derive(Debug, Error)]
pub enum Error {
    /// Text grid with wrong dimensions, invalid characters, or a missing or
    /// duplicated agent/target cell
    #[error("malformed layout: {0}")]
    MalformedLayout(String),

    /// A cell lookup expected exactly one match
    #[error("expected exactly one {cell:?} cell, found {count}")]
    AmbiguousOrMissingCell {
        /// The cell kind that was searched for
        cell: Cell,
        /// How many matches the board actually held
        count: usize,
    },

    /// A requested randomization key is outside the variant's allowed set
    #[error("randomization key {key:?} is not supported by this task, allowed: {allowed:?}")]
    InvalidRandomizationKey {
        /// The offending key
        key: RandomKey,
        /// Keys the variant accepts
        allowed: Vec<RandomKey>,
    },

    /// A grid dimension is even or outside the supported range
    #[error("unsupported grid size {0}, expected an odd value within 7..=15")]
    InvalidSize(usize),

    /// Detailed rewards were requested but the transition reported no distance
    #[error("transition info carries no distance, required for detailed rewards")]
    MissingDistanceInfo,

    /// A fixed template cannot be solved within the step budget.
    ///
    /// Raised only when no randomization could ever repair the board (an
    /// empty move set over an immutable template); randomized and generated
    /// layouts are silently retried instead.
    #[error("layout is not solvable within {budget} steps")]
    UnsolvableLayout {
        /// The step budget the layout was validated against
        budget: usize,
    },
}
