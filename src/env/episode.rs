//! Episode orchestration
//!
//! The controller shared by every task variant. It owns the immutable layout
//! template, the live board, and the per-instance random stream, drives the
//! generation/randomization policy across construction and reset, and turns
//! raw transition outcomes into shaped rewards, termination reasons, and
//! truncation.
//!
//! # Randomization protocol
//!
//! Singular keys (`Agent`, `Target`) re-place their cell once, at
//! construction or when a reset supplies a fresh seed. Plural keys
//! (`Agents`, `Targets`) re-place on every reset, and `Layouts` swaps the
//! template for a freshly generated layout per reset. Every randomized or
//! generated board passes the solvability gate before it is accepted;
//! infeasible outcomes are silently discarded and retried.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::config::{describe, Options, RandomKey};
use crate::env::{SpaceInfo, SpaceType, StepInfo, StepResult, TerminationReason, Transition};
use crate::error::Error;
use crate::grid::generate::Generate;
use crate::grid::randomize::move_cell;
use crate::grid::solve::shortest_distance;
use crate::grid::{Cell, Grid, Position};

/// Static description of a task variant consumed by [`Episode::new`].
pub struct Variant {
    /// Base display name, e.g. `Maze7`
    pub name: String,
    /// Layout generation strategy
    pub generator: Box<dyn Generate>,
    /// Immutable template; `None` generates one (fixed unless `Layouts` is
    /// requested, in which case every reset generates afresh)
    pub layout: Option<Grid>,
    /// Randomization keys this variant supports
    pub allowed: Vec<RandomKey>,
    /// Whether stepping can fail (hazards)
    pub can_fail: bool,
    /// Scale applied to the optimal path length in threshold computation
    pub step_scale: f64,
}

/// Episode controller: a deterministic state machine over reset and step.
pub struct Episode<T: Transition> {
    name: String,
    transition: T,
    generator: Box<dyn Generate>,
    options: Options,
    allowed: Vec<RandomKey>,
    can_fail: bool,
    step_scale: f64,
    rng: StdRng,
    seed: Option<u64>,
    layout: Option<Grid>,
    board: Grid,
    target: Position,
    reward_buffer: Vec<f64>,
    termination: Option<TerminationReason>,
    reward_threshold: f64,
}

impl<T: Transition> Episode<T> {
    /// Create a controller and run its initial reset.
    ///
    /// Fails fast when a requested randomization key is outside the
    /// variant's allowed set. The key list is sorted and deduplicated;
    /// singular keys are resolved here, once.
    pub fn new(variant: Variant, transition: T, mut options: Options) -> Result<Self> {
        options.random.sort();
        options.random.dedup();
        for key in &options.random {
            if !variant.allowed.contains(key) {
                return Err(Error::InvalidRandomizationKey {
                    key: *key,
                    allowed: variant.allowed.clone(),
                }
                .into());
            }
        }
        let rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let seed = options.seed;
        let mut episode = Self {
            name: variant.name,
            transition,
            generator: variant.generator,
            options,
            allowed: variant.allowed,
            can_fail: variant.can_fail,
            step_scale: variant.step_scale,
            rng,
            seed,
            layout: None,
            board: Grid::filled(1, 1, Cell::Wall),
            target: Position::new(0, 0),
            reward_buffer: Vec::new(),
            termination: None,
            reward_threshold: 0.0,
        };
        // A missing template is generated once and fixed, unless every reset
        // replaces it anyway.
        let template = match variant.layout {
            Some(layout) => Some(layout),
            None if !episode.regenerates_layouts() => {
                Some(episode.generator.generate(&mut episode.rng))
            }
            None => None,
        };
        if let Some(template) = template {
            let setup = !episode.has_per_reset_random();
            episode.layout = Some(episode.randomized(template, &RandomKey::SINGULAR, setup)?);
        }
        episode.reset(None)?;
        Ok(episode)
    }

    /// Reset to a fresh episode, optionally reseeding the random stream.
    ///
    /// A new seed forces setup randomization: singular keys are reapplied to
    /// the template and the reward threshold is recomputed. Without one, only
    /// the per-reset keys are applied to the board derived from the template.
    /// Returns the flattened observation and an empty info.
    pub fn reset(&mut self, seed: Option<u64>) -> Result<(Vec<f32>, StepInfo)> {
        self.reward_buffer.clear();
        self.termination = None;
        if let Some(seed) = seed {
            self.rng = StdRng::seed_from_u64(seed);
            self.seed = Some(seed);
            if let Some(template) = self.layout.take() {
                self.layout = Some(self.randomized(template, &RandomKey::SINGULAR, true)?);
            }
        }
        let (work, generated) = match &self.layout {
            Some(template) => (template.clone(), false),
            None => (self.generator.generate(&mut self.rng), true),
        };
        let board = self.randomized(work, &RandomKey::PER_RESET, generated)?;
        self.target = board.position_of(Cell::Target)?;
        self.board = board;
        Ok((self.board.observation(), StepInfo::default()))
    }

    /// Step the episode with a discrete action in `{0, 1, 2, 3}`.
    pub fn step(&mut self, action: i64) -> Result<StepResult> {
        let (observation, mut info) = self.transition.execute(&mut self.board, self.target, action)?;
        let mut terminated = info.termination_reason.is_some();
        let rewards = self.options.rewards;
        let reward = if self.options.explore {
            terminated = false;
            0.0
        } else if self.options.detailed {
            let distance = info.distance.ok_or(Error::MissingDistanceInfo)?;
            (-distance).exp()
        } else {
            let mut reward = rewards.step_cost;
            if let Some(reason) = info.termination_reason {
                let budget = self.step_budget_for(&self.board) as f64;
                reward += budget
                    * match reason {
                        TerminationReason::Goal => rewards.goal_rate,
                        _ => rewards.fail_rate,
                    };
            }
            reward
        };
        self.reward_buffer.push(reward);
        let truncated = self
            .options
            .max_episode_steps
            .is_some_and(|budget| self.reward_buffer.len() >= budget);
        if truncated && info.termination_reason.is_none() {
            info.termination_reason = Some(TerminationReason::Time);
        }
        let emitted = if self.options.sparse {
            if terminated || truncated {
                self.reward_buffer.iter().sum()
            } else {
                0.0
            }
        } else {
            reward
        };
        self.termination = info.termination_reason;
        Ok(StepResult { observation, reward: emitted, terminated, truncated, info })
    }

    /// Apply the subset of `keys` present in the requested randomization to
    /// `base`, then revalidate and recompute the reward threshold.
    ///
    /// Infeasible outcomes are discarded and the whole attempt retried from
    /// the input board; the feasible space is nonempty and small, so the
    /// loop terminates without a retry cap. An empty request without forced
    /// `setup` returns the board unchanged and skips the validator.
    fn randomized(&mut self, base: Grid, keys: &[RandomKey], setup: bool) -> Result<Grid> {
        let moves: Vec<Cell> = keys
            .iter()
            .filter(|key| self.options.random.contains(*key))
            .filter_map(|key| key.cell())
            .collect();
        if moves.is_empty() && !setup {
            return Ok(base);
        }
        loop {
            let mut work = base.clone();
            for cell in &moves {
                move_cell(&mut work, *cell, &mut self.rng)?;
            }
            match self.threshold_for(&work)? {
                Some(threshold) => {
                    self.reward_threshold = threshold;
                    return Ok(work);
                }
                // retrying cannot repair a board nothing re-randomizes
                None if moves.is_empty() => {
                    return Err(Error::UnsolvableLayout {
                        budget: self.step_budget_for(&work),
                    }
                    .into());
                }
                None => debug!(?moves, "randomized board unsolvable, retrying"),
            }
        }
    }

    /// Reward threshold for `board`, or `None` when its optimal path
    /// exceeds the step budget (the signal to regenerate or retry).
    fn threshold_for(&self, board: &Grid) -> Result<Option<f64>> {
        let budget = self.step_budget_for(board);
        let agent = board.position_of(Cell::Agent)?;
        let target = board.position_of(Cell::Target)?;
        let optimal = shortest_distance(board, agent, target, budget + 1);
        if optimal > budget {
            return Ok(None);
        }
        Ok(Some(
            budget as f64 * self.options.rewards.goal_rate
                + 1.2 * optimal as f64 * self.step_scale,
        ))
    }

    /// Budget used for solvability gating and terminal bonuses. Without a
    /// step limit it falls back to the board area, which bounds any simple
    /// path and keeps the validator finite.
    fn step_budget_for(&self, board: &Grid) -> usize {
        self.options.max_episode_steps.unwrap_or(board.rows() * board.cols())
    }

    fn has_per_reset_random(&self) -> bool {
        self.options.random.iter().any(|key| RandomKey::PER_RESET.contains(key))
    }

    fn regenerates_layouts(&self) -> bool {
        self.options.random.contains(&RandomKey::Layouts)
    }

    /// Live board for the current episode.
    pub fn board(&self) -> &Grid {
        &self.board
    }

    /// Immutable template layout, `None` while layouts regenerate per reset.
    pub fn layout(&self) -> Option<&Grid> {
        self.layout.as_ref()
    }

    /// Dynamic task name built from the flags and randomization keys.
    pub fn name(&self) -> String {
        describe(&self.name, &self.options)
    }

    /// Randomization keys this task accepts.
    pub fn allowed_random(&self) -> &[RandomKey] {
        &self.allowed
    }

    /// Seed of the current random stream, if one was supplied.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Number of steps taken this episode.
    pub fn steps(&self) -> usize {
        self.reward_buffer.len()
    }

    /// Rewards accumulated this episode, one per step, before sparse
    /// delaying.
    pub fn reward_buffer(&self) -> &[f64] {
        &self.reward_buffer
    }

    /// Why the most recent step ended the episode, if it did.
    pub fn termination_reason(&self) -> Option<TerminationReason> {
        self.termination
    }

    /// Near-optimal return estimate used by early-stopping policies.
    pub fn reward_threshold(&self) -> f64 {
        self.reward_threshold
    }

    /// Lowest and highest returns reachable under the current budget.
    pub fn reward_range(&self) -> (f64, f64) {
        let budget = self.step_budget_for(&self.board) as f64;
        let rewards = self.options.rewards;
        let mut min = budget * rewards.step_cost;
        if self.can_fail {
            min += budget * rewards.fail_rate;
        }
        (min, budget * rewards.goal_rate)
    }

    /// Observation space: one cell code per board cell.
    pub fn observation_space(&self) -> SpaceInfo {
        SpaceInfo {
            shape: vec![self.board.rows() * self.board.cols()],
            dtype: SpaceType::MultiDiscrete,
        }
    }

    /// Action space: the four cardinal moves.
    pub fn action_space(&self) -> SpaceInfo {
        SpaceInfo { shape: vec![], dtype: SpaceType::Discrete(4) }
    }
}
