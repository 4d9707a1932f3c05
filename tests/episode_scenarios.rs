//! End-to-end episode scenarios over the built-in task variants:
//! documented optimal-path returns, reward-mode laws, truncation boundaries,
//! and seeded randomization determinism.

use anyhow::Result;
use navbench::config::{Options, RandomKey};
use navbench::env::episode::{Episode, Variant};
use navbench::env::flat::FlatGrid;
use navbench::env::holes::{HoleyGrid, Level};
use navbench::env::maze::{reference, GridMaze};
use navbench::env::{StepInfo, StepResult, TerminationReason, Transition};
use navbench::grid::generate::RoomGen;
use navbench::grid::{solve, Cell, Grid, Position};
use navbench::Error;

/// Optimal action sequence for the curated 7x7 maze.
const MAZE_7_PATH: [i64; 8] = [1, 1, 0, 0, 1, 1, 0, 0];

fn run_path(
    env: &mut Episode<navbench::env::walk::GridWalk>,
    path: &[i64],
) -> Vec<StepResult> {
    path.iter().map(|&a| env.step(a).unwrap()).collect()
}

#[test]
fn test_maze7_dense_optimal_return() {
    let mut env = GridMaze::new(7, Options::default()).unwrap();
    let results = run_path(&mut env, &MAZE_7_PATH);
    for step in &results[..7] {
        assert_eq!(step.reward, -1.0);
        assert!(!step.terminated && !step.truncated);
    }
    let last = results.last().unwrap();
    assert!(last.terminated, "optimal path must reach the target");
    assert!(!last.truncated);
    assert_eq!(last.info.termination_reason, Some(TerminationReason::Goal));
    assert_eq!(last.reward, 49.0, "goal step pays -1 plus half the budget");
    let total: f64 = results.iter().map(|r| r.reward).sum();
    assert_eq!(total, 42.0);
}

#[test]
fn test_maze7_reference_distance_is_documented() {
    let grid = Grid::parse(reference(7).unwrap()).unwrap();
    let from = grid.position_of(Cell::Agent).unwrap();
    let to = grid.position_of(Cell::Target).unwrap();
    assert_eq!(from, Position::new(5, 1));
    assert_eq!(to, Position::new(1, 5));
    assert_eq!(solve::shortest_distance(&grid, from, to, 101), MAZE_7_PATH.len());
}

#[test]
fn test_holes_train_success_and_shift_failure() {
    let mut env = HoleyGrid::new(Level::Train, Options::default()).unwrap();
    let results = run_path(&mut env, &[2, 1, 1, 1, 1, 1, 0, 1]);
    let total: f64 = results.iter().map(|r| r.reward).sum();
    assert_eq!(total, 42.0);
    assert_eq!(
        results.last().unwrap().info.termination_reason,
        Some(TerminationReason::Goal)
    );

    let mut env = HoleyGrid::new(Level::Shift, Options::default()).unwrap();
    let results = run_path(&mut env, &[2, 1, 1]);
    let last = results.last().unwrap();
    assert!(last.terminated);
    assert_eq!(last.info.termination_reason, Some(TerminationReason::Fail));
    assert_eq!(last.reward, -51.0, "failure pays -1 minus half the budget");
    let total: f64 = results.iter().map(|r| r.reward).sum();
    assert_eq!(total, -53.0);
    assert_eq!(env.termination_reason(), Some(TerminationReason::Fail));
}

#[test]
fn test_truncation_boundary_tags_time() {
    let options = Options { max_episode_steps: Some(10), ..Options::default() };
    let mut env = FlatGrid::new(7, options).unwrap();
    // leftward moves are blocked by the border wall
    for _ in 0..9 {
        let step = env.step(3).unwrap();
        assert!(!step.terminated && !step.truncated);
        assert_eq!(step.info.termination_reason, None);
    }
    let last = env.step(3).unwrap();
    assert!(last.truncated, "budget exhaustion truncates on the exact step");
    assert!(!last.terminated);
    assert_eq!(last.info.termination_reason, Some(TerminationReason::Time));
    assert_eq!(env.termination_reason(), Some(TerminationReason::Time));
}

#[test]
fn test_goal_on_final_step_keeps_goal_reason() {
    let options = Options { max_episode_steps: Some(8), ..Options::default() };
    let mut env = GridMaze::new(7, options).unwrap();
    let results = run_path(&mut env, &MAZE_7_PATH);
    let last = results.last().unwrap();
    assert!(last.terminated && last.truncated);
    assert_eq!(last.info.termination_reason, Some(TerminationReason::Goal));
}

#[test]
fn test_sparse_rewards_are_sum_preserving() {
    let options = Options { sparse: true, ..Options::default() };
    let mut env = GridMaze::new(7, options).unwrap();
    let results = run_path(&mut env, &MAZE_7_PATH);
    for step in &results[..7] {
        assert_eq!(step.reward, 0.0, "sparse episodes pay nothing before the end");
    }
    assert_eq!(results.last().unwrap().reward, 42.0, "the final step pays the whole return");
    let buffered: f64 = env.reward_buffer().iter().sum();
    assert_eq!(buffered, 42.0);

    let options = Options { sparse: true, ..Options::default() };
    let mut env = HoleyGrid::new(Level::Shift, options).unwrap();
    let results = run_path(&mut env, &[2, 1, 1]);
    let emitted: Vec<f64> = results.iter().map(|r| r.reward).collect();
    assert_eq!(emitted, vec![0.0, 0.0, -53.0]);
}

#[test]
fn test_explore_strips_termination_and_reward() {
    let options = Options { explore: true, ..Options::default() };
    let mut env = GridMaze::new(7, options).unwrap();
    let results = run_path(&mut env, &MAZE_7_PATH);
    for step in &results {
        assert_eq!(step.reward, 0.0);
        assert!(!step.terminated, "exploration never terminates");
    }
    assert_eq!(
        results.last().unwrap().info.termination_reason,
        Some(TerminationReason::Goal),
        "the raw reason stays visible in info"
    );
    // the agent sits on the target; walking on is still possible
    let step = env.step(3).unwrap();
    assert_eq!(step.reward, 0.0);
    assert!(!step.terminated);
    assert_eq!(env.board().count(Cell::Target), 1, "the vacated target cell is restored");
}

#[test]
fn test_detailed_rewards_use_distance() {
    let options = Options { detailed: true, ..Options::default() };
    let mut env = FlatGrid::new(7, options).unwrap();
    let step = env.step(1).unwrap();
    let expected = (-(32.0f64).sqrt()).exp();
    assert!((step.reward - expected).abs() < 1e-12, "reward is exp(-distance) before the move");
}

struct NoDistance;

impl Transition for NoDistance {
    fn execute(
        &mut self,
        board: &mut Grid,
        _target: Position,
        _action: i64,
    ) -> Result<(Vec<f32>, StepInfo)> {
        Ok((board.observation(), StepInfo::default()))
    }
}

#[test]
fn test_detailed_rewards_require_distance() {
    let variant = Variant {
        name: "Stub".to_string(),
        generator: Box::new(RoomGen { rows: 7, cols: 7 }),
        layout: None,
        allowed: Vec::new(),
        can_fail: false,
        step_scale: 1.0,
    };
    let options = Options {
        detailed: true,
        max_episode_steps: Some(100),
        ..Options::default()
    };
    let mut env = Episode::new(variant, NoDistance, options).unwrap();
    let err = env.step(0).unwrap_err();
    assert!(matches!(err.downcast::<Error>().unwrap(), Error::MissingDistanceInfo));
}

#[test]
fn test_singular_agent_randomization_is_seed_deterministic() {
    let build = || {
        let options =
            Options { random: vec![RandomKey::Agent], seed: Some(42), ..Options::default() };
        GridMaze::new(7, options).unwrap()
    };
    let a = build();
    let b = build();
    assert_eq!(
        a.board().render_lines(),
        b.board().render_lines(),
        "same seed must place the agent identically"
    );
    assert_ne!(
        a.board().render_lines(),
        reference(7).unwrap(),
        "the agent left its curated corner"
    );
}

#[test]
fn test_reseeding_reset_is_reproducible() {
    let build = || {
        let options =
            Options { random: vec![RandomKey::Agent], seed: Some(1), ..Options::default() };
        GridMaze::new(7, options).unwrap()
    };
    let mut a = build();
    let mut b = build();
    a.reset(Some(5)).unwrap();
    b.reset(Some(5)).unwrap();
    assert_eq!(a.board().render_lines(), b.board().render_lines());
    assert_eq!(a.seed(), Some(5));
}

#[test]
fn test_per_reset_agent_randomization_varies() {
    let options = Options { random: vec![RandomKey::Agents], seed: Some(42), ..Options::default() };
    let mut env = FlatGrid::new(7, options).unwrap();
    let mut positions = Vec::new();
    for _ in 0..10 {
        env.reset(None).unwrap();
        assert_eq!(env.board().count(Cell::Agent), 1);
        assert_eq!(env.board().count(Cell::Target), 1);
        positions.push(env.board().position_of(Cell::Agent).unwrap());
    }
    positions.sort_by_key(|p| (p.row, p.col));
    positions.dedup();
    assert!(positions.len() > 1, "agent placement must vary across resets");

    let mut first_positions = Vec::new();
    for seed in 1..=5u64 {
        let options =
            Options { random: vec![RandomKey::Agents], seed: Some(seed), ..Options::default() };
        let env = FlatGrid::new(7, options).unwrap();
        first_positions.push(env.board().position_of(Cell::Agent).unwrap());
    }
    first_positions.sort_by_key(|p| (p.row, p.col));
    first_positions.dedup();
    assert!(first_positions.len() > 1, "different seeds must place differently");
}

#[test]
fn test_layout_randomization_regenerates_per_reset() {
    let options = Options { random: vec![RandomKey::Layouts], seed: Some(3), ..Options::default() };
    let mut env = GridMaze::new(7, options).unwrap();
    assert!(env.layout().is_none(), "layout-randomized tasks hold no template");
    let mut boards = Vec::new();
    for _ in 0..5 {
        env.reset(None).unwrap();
        let board = env.board().clone();
        assert_ne!(board.render_lines(), reference(7).unwrap());
        assert!(solve::is_solvable(&board, 100).unwrap());
        boards.push(board.render_lines());
    }
    boards.sort();
    boards.dedup();
    assert!(boards.len() > 1, "fresh layouts must vary across resets");
}

#[test]
fn test_randomized_boards_stay_solvable() {
    let options = Options {
        random: vec![RandomKey::Agents, RandomKey::Layouts, RandomKey::Targets],
        seed: Some(7),
        ..Options::default()
    };
    let mut env = HoleyGrid::new(Level::Sized(9), options).unwrap();
    for _ in 0..10 {
        env.reset(None).unwrap();
        assert_eq!(env.board().count(Cell::Agent), 1);
        assert_eq!(env.board().count(Cell::Target), 1);
        assert!(
            solve::is_solvable(env.board(), 100).unwrap(),
            "every randomized board must stay solvable within the budget"
        );
    }
}

#[test]
fn test_deterministic_task_restores_reference_layout() {
    let mut env = GridMaze::new(7, Options::default()).unwrap();
    assert_eq!(env.board().render_lines(), reference(7).unwrap());
    env.step(1).unwrap();
    env.reset(None).unwrap();
    assert_eq!(env.board().render_lines(), reference(7).unwrap());
}

#[test]
fn test_reward_threshold_for_reference_maze() {
    let env = GridMaze::new(7, Options::default()).unwrap();
    assert!((env.reward_threshold() - (50.0 + 1.2 * 8.0)).abs() < 1e-9);
}
