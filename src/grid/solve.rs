//! Shortest-path validation
//!
//! A bounded backtracking search over walkable field cells. One call answers
//! two questions at once: whether the board is solvable within a step budget,
//! and how long the optimal path is (the input to reward-threshold
//! computation). Boards are at most 15x15, so exhaustive backtracking with
//! branch-and-bound pruning stays cheap.

use tracing::trace;

use crate::error::Error;
use crate::grid::{Cell, Grid, Position};

/// Shortest walkable distance from `from` to `to`, capped at `bound`.
///
/// Agent and target cells are provisionally cleared to field on a scratch
/// copy, so the endpoints themselves are walkable. Returns `bound` unchanged
/// when no path shorter than `bound` exists; a caller passing `budget + 1`
/// can therefore read the result both as a solvability gate (`result >
/// budget` means unsolvable) and as the optimal path length.
pub fn shortest_distance(grid: &Grid, from: Position, to: Position, bound: usize) -> usize {
    let mut scratch = grid.clone();
    scratch.set(from, Cell::Field);
    scratch.set(to, Cell::Field);
    if !reachable(&scratch, from, to) {
        trace!(?from, ?to, "target unreachable");
        return bound;
    }
    let mut visited = vec![false; scratch.rows() * scratch.cols()];
    let mut best = bound;
    search(&scratch, from, to, 0, &mut best, &mut visited);
    trace!(distance = best, bound, "shortest path search complete");
    best
}

/// Whether the agent can reach the target within `budget` steps.
pub fn is_solvable(grid: &Grid, budget: usize) -> Result<bool, Error> {
    let from = grid.position_of(Cell::Agent)?;
    let to = grid.position_of(Cell::Target)?;
    Ok(shortest_distance(grid, from, to, budget + 1) <= budget)
}

/// Flood-fill connectivity pre-pass, cheap rejection of split boards.
fn reachable(grid: &Grid, from: Position, to: Position) -> bool {
    let mut seen = vec![false; grid.rows() * grid.cols()];
    let mut stack = vec![from];
    seen[grid.index_of(from)] = true;
    while let Some(pos) = stack.pop() {
        if pos == to {
            return true;
        }
        for (_, next) in grid.moves(pos, 1, |a, p, n| grid.action_in_bounds(a, p, n)) {
            if grid.get(next) == Some(Cell::Field) && !seen[grid.index_of(next)] {
                seen[grid.index_of(next)] = true;
                stack.push(next);
            }
        }
    }
    false
}

/// Depth-first backtracking with a visited-on-this-path marker.
///
/// `visited` is unmarked on backtrack, so a cell may be revisited via a
/// different branch. `best` is shared across the whole search and starts at
/// the bound; a branch is abandoned once its depth plus the Manhattan lower
/// bound cannot beat it.
fn search(
    grid: &Grid,
    pos: Position,
    to: Position,
    depth: usize,
    best: &mut usize,
    visited: &mut [bool],
) {
    if pos == to {
        *best = (*best).min(depth);
        return;
    }
    if depth + pos.manhattan(to) >= *best {
        return;
    }
    visited[grid.index_of(pos)] = true;
    let mut steps: Vec<(usize, Position)> = grid
        .moves(pos, 1, |a, p, n| grid.action_in_bounds(a, p, n))
        .into_iter()
        .filter(|(_, next)| grid.get(*next) == Some(Cell::Field) && !visited[grid.index_of(*next)])
        .map(|(_, next)| (next.manhattan(to), next))
        .collect();
    steps.sort_by_key(|(remaining, _)| *remaining);
    for (_, next) in steps {
        search(grid, next, to, depth + 1, best, visited);
    }
    visited[grid.index_of(pos)] = false;
}
