//! Plain open-room tasks
//!
//! The degenerate navigation benchmark: an empty room with agent and target
//! in opposite corners. Useful as a sanity check for agents and for
//! exercising randomized placement without obstacles.

use anyhow::Result;

use crate::config::{Options, RandomKey};
use crate::env::episode::{Episode, Variant};
use crate::env::walk::GridWalk;
use crate::grid::generate::RoomGen;
use crate::grid::Grid;

/// Open-room navigation task builder.
pub struct FlatGrid;

impl FlatGrid {
    /// Randomization keys open rooms accept.
    pub const ALLOWED: [RandomKey; 4] =
        [RandomKey::Agent, RandomKey::Agents, RandomKey::Target, RandomKey::Targets];

    /// Build an open-room episode of the given odd `size` in `7..=15`.
    pub fn new(size: usize, mut options: Options) -> Result<Episode<GridWalk>> {
        Grid::check_dimension(size)?;
        if options.max_episode_steps.is_none() {
            options.max_episode_steps = Some(100);
        }
        let variant = Variant {
            name: format!("FlatGrid{size}"),
            generator: Box::new(RoomGen { rows: size, cols: size }),
            layout: None,
            allowed: Self::ALLOWED.to_vec(),
            can_fail: false,
            step_scale: 1.0,
        };
        Episode::new(variant, GridWalk, options)
    }
}
