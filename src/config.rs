//! Task configuration and naming
//!
//! Options shared by every task variant: reward shaping flags, the step
//! budget, seeding, and the randomization keys controlling when agent,
//! target, and layout are re-randomized.

use serde::{Deserialize, Serialize};

use crate::grid::Cell;

/// A named stochastic feature of a task.
///
/// Singular keys (`Agent`, `Target`) resolve once, at construction or on a
/// forced reseed; plural keys and `Layouts` resolve on every reset. The
/// variant order matches the lexicographic order of the labels, so sorting
/// keys sorts their name fragments too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RandomKey {
    /// Randomize the agent position once
    Agent,
    /// Randomize the agent position on every reset
    Agents,
    /// Generate a fresh layout on every reset
    Layouts,
    /// Randomize the target position once
    Target,
    /// Randomize the target position on every reset
    Targets,
}

impl RandomKey {
    /// Keys resolved once, at construction or on a forced reseed.
    pub const SINGULAR: [RandomKey; 2] = [RandomKey::Agent, RandomKey::Target];

    /// Keys re-resolved on every reset.
    pub const PER_RESET: [RandomKey; 3] =
        [RandomKey::Agents, RandomKey::Layouts, RandomKey::Targets];

    /// The movable cell this key re-places, if any.
    pub fn cell(self) -> Option<Cell> {
        match self {
            RandomKey::Agent | RandomKey::Agents => Some(Cell::Agent),
            RandomKey::Target | RandomKey::Targets => Some(Cell::Target),
            RandomKey::Layouts => None,
        }
    }

    /// Name fragment used by [`describe`].
    pub fn label(self) -> &'static str {
        match self {
            RandomKey::Agent => "Agent",
            RandomKey::Agents => "Agents",
            RandomKey::Layouts => "Layouts",
            RandomKey::Target => "Target",
            RandomKey::Targets => "Targets",
        }
    }
}

/// Per-instance reward magnitudes.
///
/// Terminal bonuses scale with the episode step budget: reaching the target
/// adds `goal_rate * budget` on top of the final step cost, failing adds
/// `fail_rate * budget`. Keeping these on the instance lets concurrently
/// running episodes shape rewards independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Terminal bonus rate on reaching the target, times the step budget
    pub goal_rate: f64,
    /// Cost of a single step
    pub step_cost: f64,
    /// Terminal penalty rate on failure, times the step budget
    pub fail_rate: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self { goal_rate: 0.5, step_cost: -1.0, fail_rate: -0.5 }
    }
}

/// Options accepted by every task variant constructor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    /// Requested randomization keys (sorted and deduplicated at construction)
    pub random: Vec<RandomKey>,
    /// Delay all reward to the final step of the episode
    pub sparse: bool,
    /// Reward `exp(-distance)` instead of step costs and terminal bonuses
    pub detailed: bool,
    /// Strip goal and failure semantics, rewarding nothing
    pub explore: bool,
    /// Step budget; `None` lets the variant apply its documented default
    pub max_episode_steps: Option<usize>,
    /// Seed for the per-instance random stream
    pub seed: Option<u64>,
    /// Reward magnitudes
    pub rewards: RewardConfig,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            random: Vec::new(),
            sparse: false,
            detailed: false,
            explore: false,
            max_episode_steps: None,
            seed: None,
            rewards: RewardConfig::default(),
        }
    }
}

/// Stable display name for a task configuration.
///
/// Concatenates the base name, the active Explore/Sparse/Detailed flags, and
/// the sorted, deduplicated randomization keys. The concatenation order is
/// fixed so equal configurations always describe identically.
pub fn describe(base: &str, options: &Options) -> String {
    let mut name = String::from(base);
    let flags =
        [(options.explore, "Explore"), (options.sparse, "Sparse"), (options.detailed, "Detailed")];
    for (active, label) in flags {
        if active {
            name.push_str(label);
        }
    }
    let mut keys = options.random.clone();
    keys.sort();
    keys.dedup();
    for key in keys {
        name.push_str(key.label());
    }
    name
}
