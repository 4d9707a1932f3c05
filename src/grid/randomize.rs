//! Stochastic cell placement
//!
//! Moves the unique agent or target cell to a uniformly sampled interior
//! field cell. Feasibility checking is the caller's job: the episode
//! controller validates the resulting board and retries the whole placement
//! when it turns out unsolvable.

use rand::rngs::StdRng;
use rand::Rng;

use crate::error::Error;
use crate::grid::{Cell, Grid, Position};

/// Move the unique `cell` to a random interior field cell.
///
/// Samples uniformly over interior coordinates and retries until one lands
/// on free field. The vacated cell reverts to field. Returns the old and new
/// positions.
pub fn move_cell(
    grid: &mut Grid,
    cell: Cell,
    rng: &mut StdRng,
) -> Result<(Position, Position), Error> {
    let old = grid.position_of(cell)?;
    let mut new = sample_interior(grid, rng);
    while grid.get(new) != Some(Cell::Field) {
        new = sample_interior(grid, rng);
    }
    grid.set(old, Cell::Field);
    grid.set(new, cell);
    Ok((old, new))
}

fn sample_interior(grid: &Grid, rng: &mut StdRng) -> Position {
    Position::new(
        rng.gen_range(1..grid.rows() as i32 - 1),
        rng.gen_range(1..grid.cols() as i32 - 1),
    )
}
