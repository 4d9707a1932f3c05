//! Maze navigation tasks
//!
//! Curated reference mazes for every supported odd size plus procedurally
//! carved ones when layout randomization is requested. The step budget
//! scales with the longest path a maze of the size can carve.

use anyhow::Result;

use crate::config::{Options, RandomKey};
use crate::env::episode::{Episode, Variant};
use crate::env::walk::GridWalk;
use crate::error::Error;
use crate::grid::generate::MazeGen;
use crate::grid::Grid;

const MAZE_7: [&str; 7] = [
    "#######",
    "#    T#",
    "# ### #",
    "# #   #",
    "### # #",
    "#A  # #",
    "#######",
];

const MAZE_9: [&str; 9] = [
    "#########",
    "#      T#",
    "# ##### #",
    "# #     #",
    "# # ### #",
    "# #   # #",
    "##### # #",
    "#A    # #",
    "#########",
];

const MAZE_11: [&str; 11] = [
    "###########",
    "#        T#",
    "# ##### ###",
    "#     #   #",
    "##### ### #",
    "#     #   #",
    "# ##### # #",
    "# #     # #",
    "### ##### #",
    "#A  #     #",
    "###########",
];

const MAZE_13: [&str; 13] = [
    "#############",
    "#     #    T#",
    "# ##### # # #",
    "# #     # # #",
    "# # ##### # #",
    "#   #   # # #",
    "# ### # # ###",
    "# #   # #   #",
    "# # ### ### #",
    "# #   #     #",
    "##### ##### #",
    "#A    #     #",
    "#############",
];

const MAZE_15: [&str; 15] = [
    "###############",
    "#     #      T#",
    "# ### # ##### #",
    "#   # # #     #",
    "### # # # ### #",
    "# # # # # #   #",
    "# # # # # ### #",
    "#   #   #   # #",
    "########### ###",
    "#         #   #",
    "# ####### ### #",
    "#   #   #   # #",
    "### # ##### # #",
    "#A  #         #",
    "###############",
];

/// Curated reference maze for `size`, or `None` for unsupported sizes.
pub fn reference(size: usize) -> Option<&'static [&'static str]> {
    match size {
        7 => Some(&MAZE_7),
        9 => Some(&MAZE_9),
        11 => Some(&MAZE_11),
        13 => Some(&MAZE_13),
        15 => Some(&MAZE_15),
        _ => None,
    }
}

/// Maze navigation task builder.
pub struct GridMaze;

impl GridMaze {
    /// Randomization keys mazes accept.
    pub const ALLOWED: [RandomKey; 5] = [
        RandomKey::Agent,
        RandomKey::Agents,
        RandomKey::Layouts,
        RandomKey::Target,
        RandomKey::Targets,
    ];

    /// Default step budget for a maze of `size`, scaled to the longest path
    /// a carve can produce and rounded up to the next hundred.
    pub fn budget(size: usize) -> usize {
        let longest = ((size - 1).pow(2) / 2 - 2) as f64;
        ((longest * 1.2 / 100.0).ceil() * 100.0) as usize
    }

    /// Build a maze episode of the given odd `size` in `7..=15`.
    ///
    /// Without `Layouts` randomization the curated maze for the size is the
    /// fixed template; with it, a fresh maze is carved on every reset.
    pub fn new(size: usize, mut options: Options) -> Result<Episode<GridWalk>> {
        let Some(lines) = reference(size) else {
            return Err(Error::InvalidSize(size).into());
        };
        if options.max_episode_steps.is_none() {
            options.max_episode_steps = Some(Self::budget(size));
        }
        let layout = if options.random.contains(&RandomKey::Layouts) {
            None
        } else {
            Some(Grid::parse(lines)?)
        };
        let variant = Variant {
            name: format!("Maze{size}"),
            generator: Box::new(MazeGen { size, exclude: Some(lines) }),
            layout,
            allowed: Self::ALLOWED.to_vec(),
            can_fail: false,
            step_scale: 1.0,
        };
        Episode::new(variant, GridWalk, options)
    }
}
