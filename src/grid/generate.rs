//! Layout generation
//!
//! Random layout producers behind the [`Generate`] strategy trait: plain open
//! rooms, recursive-backtracker mazes, and hazard-scattered fields. Each is a
//! pure function of the supplied random stream and its configured size, and
//! returns a fresh grid guaranteed to satisfy the layout invariants (wall
//! border, one agent, one target).

use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

use crate::grid::{solve, Cell, Grid, Position};

/// Layout generation strategy for a task variant.
pub trait Generate {
    /// Produce a fresh random layout.
    fn generate(&self, rng: &mut StdRng) -> Grid;
}

/// Open rectangular room with the agent and target in opposite corners.
pub fn open_room(rows: usize, cols: usize) -> Grid {
    let mut grid = Grid::filled(rows, cols, Cell::Wall);
    for row in 1..rows as i32 - 1 {
        for col in 1..cols as i32 - 1 {
            grid.set(Position::new(row, col), Cell::Field);
        }
    }
    grid.set(agent_corner(rows), Cell::Agent);
    grid.set(target_corner(cols), Cell::Target);
    grid
}

/// Fixed agent start corner: bottom left of the interior.
pub fn agent_corner(rows: usize) -> Position {
    Position::new(rows as i32 - 2, 1)
}

/// Fixed target corner: top right of the interior.
pub fn target_corner(cols: usize) -> Position {
    Position::new(1, cols as i32 - 2)
}

/// Generates plain open rooms.
#[derive(Debug, Clone)]
pub struct RoomGen {
    /// Room height
    pub rows: usize,
    /// Room width
    pub cols: usize,
}

impl Generate for RoomGen {
    fn generate(&self, _rng: &mut StdRng) -> Grid {
        open_room(self.rows, self.cols)
    }
}

/// Carves random square mazes with a recursive backtracker.
///
/// Passages are cut in 2-cell strides starting from the fixed agent corner,
/// picking uniformly among unvisited neighbors and backtracking when none
/// remain. A carve that reproduces the curated maze of this size is thrown
/// away and redone, keeping the procedural pool distinct from the reference
/// set.
#[derive(Debug, Clone)]
pub struct MazeGen {
    /// Maze size (odd, 7..=15)
    pub size: usize,
    /// Curated layout the carver must not reproduce
    pub exclude: Option<&'static [&'static str]>,
}

impl Generate for MazeGen {
    fn generate(&self, rng: &mut StdRng) -> Grid {
        loop {
            let maze = carve(self.size, rng);
            if let Some(reference) = self.exclude {
                if maze.render_lines() == reference {
                    debug!(size = self.size, "carved the curated maze, regenerating");
                    continue;
                }
            }
            return maze;
        }
    }
}

fn carve(size: usize, rng: &mut StdRng) -> Grid {
    let mut maze = Grid::filled(size, size, Cell::Wall);
    let mut visited = vec![false; size * size];
    let start = agent_corner(size);
    carve_from(&mut maze, start, &mut visited, rng);
    maze.set(start, Cell::Agent);
    maze.set(target_corner(size), Cell::Target);
    maze
}

fn carve_from(maze: &mut Grid, pos: Position, visited: &mut [bool], rng: &mut StdRng) {
    maze.set(pos, Cell::Field);
    visited[maze.index_of(pos)] = true;
    loop {
        let open: Vec<_> = maze
            .moves(pos, 2, |a, p, n| maze.action_in_bounds(a, p, n))
            .into_iter()
            .filter(|(_, next)| !visited[maze.index_of(*next)])
            .map(|(action, _)| action)
            .collect();
        if open.is_empty() {
            return;
        }
        let action = open[rng.gen_range(0..open.len())];
        maze.set(pos.step(action, 1), Cell::Field);
        carve_from(maze, pos.step(action, 2), visited, rng);
    }
}

/// Scatters hazards over an open room, rejecting unsolvable fields.
///
/// Hazards are placed on uniformly sampled interior field cells until the
/// count reaches the mean of the two dimensions. A field whose shortest
/// agent-to-target path exceeds the step budget is discarded wholesale and
/// rebuilt; hazard density is low relative to area, so a feasible
/// configuration always turns up.
#[derive(Debug, Clone)]
pub struct HolesGen {
    /// Field height
    pub rows: usize,
    /// Field width
    pub cols: usize,
    /// Step budget the field must stay solvable within
    pub budget: usize,
}

impl Generate for HolesGen {
    fn generate(&self, rng: &mut StdRng) -> Grid {
        let quota = (self.rows + self.cols) / 2;
        loop {
            let mut grid = open_room(self.rows, self.cols);
            let mut hazards = 0;
            while hazards < quota {
                let pos = Position::new(
                    rng.gen_range(1..self.rows as i32 - 1),
                    rng.gen_range(1..self.cols as i32 - 1),
                );
                if grid.get(pos) == Some(Cell::Field) {
                    grid.set(pos, Cell::Hazard);
                    hazards += 1;
                }
            }
            let start = agent_corner(self.rows);
            let goal = target_corner(self.cols);
            if solve::shortest_distance(&grid, start, goal, self.budget + 1) <= self.budget {
                return grid;
            }
            debug!("hazard field unsolvable within budget, regenerating");
        }
    }
}
