//! FOURLINE MCTS - Monte Carlo Tree Search column selection
//!
//! This crate provides the move-decision engine:
//! - Arena-allocated search tree with UCB1 selection
//! - Sequential variant: uniform rollouts played to terminal states
//! - Parallel variant: disjoint per-worker trees with center-biased,
//!   depth-capped rollouts, merged at the caller's root
//!
//! Iteration budgets at or above the medium preset run the parallel
//! variant; smaller budgets stay on a single thread where the fork/join
//! overhead would dominate.

mod rollout;
mod search;
mod tree;

pub use rollout::{terminal_reward, RolloutPolicy, CENTER_COLUMN, ROLLOUT_DEPTH_CAP};
pub use search::{MoveStats, SearchOutcome};
pub use tree::{NodeId, SearchNode, SearchTree};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use fourline_core::GameState;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Iteration preset for casual play
pub const EASY_ITERATIONS: u32 = 500;
/// Iteration preset for standard play; also the parallel cutover point
pub const MEDIUM_ITERATIONS: u32 = 2_000;
/// Iteration preset for strong play
pub const HARD_ITERATIONS: u32 = 8_000;
/// Budgets at or above this run the parallel variant
pub const PARALLEL_THRESHOLD: u32 = MEDIUM_ITERATIONS;

/// MCTS configuration
#[derive(Clone, Debug)]
pub struct MctsConfig {
    /// Total iteration budget per move decision
    pub iterations: u32,
    /// UCB1 exploration constant
    pub exploration: f64,
    /// Emit per-search diagnostics through `tracing`
    pub debug: bool,
    /// Master seed; worker RNGs derive from it. None draws from entropy.
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: MEDIUM_ITERATIONS,
            exploration: std::f64::consts::SQRT_2,
            debug: false,
            seed: None,
        }
    }
}

impl MctsConfig {
    /// Preset with the easy iteration budget
    pub fn easy() -> Self {
        Self {
            iterations: EASY_ITERATIONS,
            ..Default::default()
        }
    }

    /// Preset with the medium iteration budget
    pub fn medium() -> Self {
        Self {
            iterations: MEDIUM_ITERATIONS,
            ..Default::default()
        }
    }

    /// Preset with the hard iteration budget
    pub fn hard() -> Self {
        Self {
            iterations: HARD_ITERATIONS,
            ..Default::default()
        }
    }

    /// Create config with a specific iteration budget
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Create config with a specific exploration constant
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    /// Create config with a fixed master seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable per-search diagnostics
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Column-selection engine; holds no state between searches
pub struct MctsEngine {
    config: MctsConfig,
}

impl MctsEngine {
    pub fn new(config: MctsConfig) -> Self {
        Self { config }
    }

    /// Get configuration
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Search the position and pick a column.
    ///
    /// The input state is never mutated; every variant works on its own
    /// copies. Returns None only for positions that are already over.
    pub fn search(&self, state: &GameState) -> Option<SearchOutcome> {
        if state.is_over() {
            return None;
        }

        let master_seed = self.config.seed.unwrap_or_else(rand::random);

        let tree = if self.config.iterations >= PARALLEL_THRESHOLD {
            let workers = worker_count();
            if self.config.debug {
                tracing::debug!(
                    workers,
                    per_worker = (self.config.iterations / workers as u32).max(1),
                    total = self.config.iterations,
                    "parallel search"
                );
            }
            search::run_parallel(
                state,
                self.config.iterations,
                self.config.exploration,
                workers,
                master_seed,
            )
        } else {
            if self.config.debug {
                tracing::debug!(total = self.config.iterations, "sequential search");
            }
            let mut rng = ChaCha8Rng::seed_from_u64(master_seed);
            search::run_sequential(state, self.config.iterations, self.config.exploration, &mut rng)
        };

        search::outcome(&tree)
    }
}

/// One worker per available core, never fewer than one
fn worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

// ============================================================================
// TESTS
// ============================================================================
