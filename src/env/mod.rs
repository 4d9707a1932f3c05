//! Episode control and task variants
//!
//! This module defines the transition interface between the shared episode
//! controller and variant-specific behavior, the step result types, and the
//! built-in navigation task variants.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::grid::{Grid, Position};

pub mod episode;
pub mod flat;
pub mod holes;
pub mod maze;
pub mod walk;

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminationReason {
    /// The agent reached the target
    Goal,
    /// The agent stepped into a hazard
    Fail,
    /// The step budget ran out
    Time,
}

/// Per-step information from the transition and the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepInfo {
    /// Euclidean agent-to-target distance before the move
    pub distance: Option<f64>,
    /// Set when this step ended the episode
    pub termination_reason: Option<TerminationReason>,
}

/// Result of one environment step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Next observation
    pub observation: Vec<f32>,

    /// Shaped reward
    pub reward: f64,

    /// Whether the episode terminated (goal or failure)
    pub terminated: bool,

    /// Whether the episode was cut off by the step budget
    pub truncated: bool,

    /// Additional info
    pub info: StepInfo,
}

/// Space information for observations and actions
#[derive(Debug, Clone)]
pub struct SpaceInfo {
    /// Shape of the space
    pub shape: Vec<usize>,

    /// Data type
    pub dtype: SpaceType,
}

/// Space data types
#[derive(Debug, Clone, Copy)]
pub enum SpaceType {
    /// Discrete space with n options
    Discrete(usize),

    /// Multi-discrete space
    MultiDiscrete,
}

/// Variant-owned transition function consumed by the episode controller.
///
/// Implementations mutate the live board according to `action` and report
/// the raw consequences; reward shaping, truncation, and bookkeeping stay
/// with the controller. `target` is the cached target position, needed to
/// restore a target cell the agent walks across.
pub trait Transition {
    /// Apply `action` to `board`, returning the next observation and info.
    fn execute(
        &mut self,
        board: &mut Grid,
        target: Position,
        action: i64,
    ) -> Result<(Vec<f32>, StepInfo)>;
}
