//! Hazard-field navigation tasks
//!
//! Open rooms with scattered hazard cells. Stepping into a hazard fails the
//! episode. Two curated 7x9 fields support distribution-shift experiments;
//! numeric sizes generate square fields procedurally.

use anyhow::Result;

use crate::config::{Options, RandomKey};
use crate::env::episode::{Episode, Variant};
use crate::env::walk::GridWalk;
use crate::grid::generate::HolesGen;
use crate::grid::Grid;

const TRAIN: [&str; 7] = [
    "#########",
    "#A HHH T#",
    "#       #",
    "#       #",
    "#       #",
    "#  HHH  #",
    "#########",
];

const SHIFT: [&str; 7] = [
    "#########",
    "#A HHH T#",
    "#  HHH  #",
    "#       #",
    "#       #",
    "#       #",
    "#########",
];

/// Which hazard field to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Curated training field
    Train,
    /// Curated field with the hazards shifted toward the agent's row
    Shift,
    /// Procedurally generated square field of the given odd size
    Sized(usize),
}

/// Hazard-field navigation task builder.
pub struct HoleyGrid;

impl HoleyGrid {
    /// Randomization keys the curated fields accept.
    pub const ALLOWED_CURATED: [RandomKey; 4] =
        [RandomKey::Agent, RandomKey::Agents, RandomKey::Target, RandomKey::Targets];

    /// Randomization keys generated fields accept.
    pub const ALLOWED_SIZED: [RandomKey; 5] = [
        RandomKey::Agent,
        RandomKey::Agents,
        RandomKey::Layouts,
        RandomKey::Target,
        RandomKey::Targets,
    ];

    /// Build a hazard-field episode.
    ///
    /// Curated levels keep their authored field as the fixed template.
    /// `Sized` levels generate one at construction, or per reset when
    /// `Layouts` randomization is requested.
    pub fn new(level: Level, mut options: Options) -> Result<Episode<GridWalk>> {
        if options.max_episode_steps.is_none() {
            options.max_episode_steps = Some(100);
        }
        let budget = options.max_episode_steps.unwrap_or(100);
        let variant = match level {
            Level::Train | Level::Shift => {
                let (name, lines): (_, &[&str]) = match level {
                    Level::Train => ("HolesTrain", &TRAIN),
                    _ => ("HolesShift", &SHIFT),
                };
                let layout = Grid::parse(lines)?;
                Variant {
                    name: name.to_string(),
                    generator: Box::new(HolesGen {
                        rows: layout.rows(),
                        cols: layout.cols(),
                        budget,
                    }),
                    layout: Some(layout),
                    allowed: Self::ALLOWED_CURATED.to_vec(),
                    can_fail: true,
                    step_scale: 1.0,
                }
            }
            Level::Sized(size) => {
                Grid::check_dimension(size)?;
                Variant {
                    name: format!("Holes{size}"),
                    generator: Box::new(HolesGen { rows: size, cols: size, budget }),
                    layout: None,
                    allowed: Self::ALLOWED_SIZED.to_vec(),
                    can_fail: true,
                    step_scale: 1.0,
                }
            }
        };
        Episode::new(variant, GridWalk, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::solve;
    use crate::grid::Cell;

    #[test]
    fn test_curated_fields_parse_and_solve() {
        for lines in [&TRAIN, &SHIFT] {
            let grid = Grid::parse(lines).unwrap();
            assert_eq!((grid.rows(), grid.cols()), (7, 9));
            assert_eq!(grid.count(Cell::Hazard), 6);
            assert!(solve::is_solvable(&grid, 100).unwrap());
        }
    }

    #[test]
    fn test_curated_field_rejects_layout_randomization() {
        let options = Options { random: vec![RandomKey::Layouts], seed: Some(1), ..Options::default() };
        assert!(HoleyGrid::new(Level::Train, options).is_err());
    }

    #[test]
    fn test_sized_field_generates_fixed_template() {
        let options = Options { seed: Some(9), ..Options::default() };
        let mut env = HoleyGrid::new(Level::Sized(9), options).unwrap();
        let template = env.layout().expect("sized field fixes a generated template").clone();
        env.reset(None).unwrap();
        assert_eq!(env.board(), &template, "resets reuse the generated template");
        assert_eq!(env.board().count(Cell::Hazard), 9);
    }

    #[test]
    fn test_sized_field_rejects_even_size() {
        assert!(HoleyGrid::new(Level::Sized(8), Options::default()).is_err());
    }

    #[test]
    fn test_name_includes_level() {
        let env = HoleyGrid::new(Level::Shift, Options::default()).unwrap();
        assert_eq!(env.name(), "HolesShift");
        let env = HoleyGrid::new(Level::Sized(11), Options { seed: Some(3), ..Options::default() })
            .unwrap();
        assert_eq!(env.name(), "Holes11");
    }
}
