//! Discrete grid transition
//!
//! One cardinal step per action. Walls block, the target terminates with
//! GOAL, hazards terminate with FAIL.

use anyhow::Result;

use crate::env::{StepInfo, TerminationReason, Transition};
use crate::grid::{Action, Cell, Grid, Position};

/// The discrete transition shared by all grid task variants.
///
/// The reported `distance` is measured from the agent position before the
/// move. A hazard hit leaves the board untouched so the one-agent invariant
/// survives even when exploration strips the failure. A vacated target cell
/// is restored, letting explorative episodes walk across it.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridWalk;

impl Transition for GridWalk {
    fn execute(
        &mut self,
        board: &mut Grid,
        target: Position,
        action: i64,
    ) -> Result<(Vec<f32>, StepInfo)> {
        let position = board.position_of(Cell::Agent)?;
        let next = position.step(Action::from_index(action), 1);
        let mut info =
            StepInfo { distance: Some(position.distance(target)), termination_reason: None };
        match board.get(next) {
            Some(Cell::Target) => {
                info.termination_reason = Some(TerminationReason::Goal);
                board.set(position, vacated(position, target));
                board.set(next, Cell::Agent);
            }
            Some(Cell::Hazard) => {
                info.termination_reason = Some(TerminationReason::Fail);
            }
            Some(Cell::Field) => {
                board.set(position, vacated(position, target));
                board.set(next, Cell::Agent);
            }
            // wall or grid edge: the move is blocked
            _ => {}
        }
        Ok((board.observation(), info))
    }
}

/// Cell left behind when the agent moves off `position`.
fn vacated(position: Position, target: Position) -> Cell {
    if position == target {
        Cell::Target
    } else {
        Cell::Field
    }
}
