//! MCTS search loop
//!
//! Implements the four phases over the arena tree:
//! 1. Selection - UCB1 descent while nodes are fully explored
//! 2. Expansion - attach the first untried column
//! 3. Simulation - rollout with the variant's policy
//! 4. Backpropagation - sign-flipping reward walk to the root
//!
//! The parallel variant fans the iteration budget out over workers that
//! each own a private tree, then merges the per-column summaries into a
//! fresh caller-side root.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use fourline_core::GameState;

use crate::rollout::{rollout, RolloutPolicy};
use crate::tree::{NodeId, SearchTree};

// ============================================================================
// SEARCH OUTCOME
// ============================================================================

/// Root statistics for one explored column
#[derive(Clone, Debug)]
pub struct MoveStats {
    pub column: usize,
    pub visits: u64,
    pub reward: f64,
    /// Fraction of root visits spent under this column
    pub share: f64,
}

/// Result of a completed search
#[derive(Clone, Debug)]
pub struct SearchOutcome {
    /// Most-visited root column
    pub column: usize,
    /// One entry per explored root child, in expansion order
    pub moves: Vec<MoveStats>,
}

impl SearchOutcome {
    /// Visit shares in root-child order
    pub fn shares(&self) -> Vec<f64> {
        self.moves.iter().map(|m| m.share).collect()
    }
}

// ============================================================================
// SINGLE ITERATION (shared by both variants)
// ============================================================================

/// Run `iterations` select/expand/simulate/backpropagate cycles
pub(crate) fn run_iterations<R: Rng>(
    tree: &mut SearchTree,
    iterations: u32,
    exploration: f64,
    policy: RolloutPolicy,
    rng: &mut R,
) {
    for _ in 0..iterations {
        let (leaf, turn) = select_and_expand(tree, exploration);
        let reward = rollout(&tree.get(leaf).state, turn, policy, rng);
        backpropagate(tree, leaf, reward, turn);
    }
}

/// Descend with UCB1 until a node still has untried columns, expand one,
/// and return the frontier node together with its perspective sign.
///
/// The sign starts at -1 for the root and flips on every edge, so it
/// always encodes the player who moved into the returned node.
fn select_and_expand(tree: &mut SearchTree, exploration: f64) -> (NodeId, i8) {
    let mut id = NodeId::ROOT;
    let mut turn = -1i8;

    loop {
        if tree.is_terminal(id) {
            return (id, turn);
        }
        if !tree.fully_explored(id) {
            if let Some(child) = expand(tree, id) {
                return (child, -turn);
            }
        }
        match tree.best_child(id, exploration) {
            Some(next) => {
                id = next;
                turn = -turn;
            }
            None => return (id, turn),
        }
    }
}

/// Attach a child for the first legal column without one, in ascending
/// column order
fn expand(tree: &mut SearchTree, id: NodeId) -> Option<NodeId> {
    let column = {
        let node = tree.get(id);
        node.state
            .legal_moves()
            .into_iter()
            .find(|col| !node.children_move.contains(col))?
    };

    let mut state = tree.get(id).state.clone();
    // Columns come from legal_moves, so the play cannot fail
    state.play(column).ok()?;
    Some(tree.add_child(id, state, column))
}

/// Walk to the root adding the reward with an alternating sign
fn backpropagate(tree: &mut SearchTree, leaf: NodeId, reward: f64, mut turn: i8) {
    let mut current = Some(leaf);
    while let Some(id) = current {
        let node = tree.get_mut(id);
        node.visits += 1;
        node.reward -= f64::from(turn) * reward;
        current = node.parent;
        turn = -turn;
    }
}

// ============================================================================
// SEQUENTIAL VARIANT
// ============================================================================

/// Single-threaded search: uniform rollouts played to terminal states
pub(crate) fn run_sequential(
    state: &GameState,
    iterations: u32,
    exploration: f64,
    rng: &mut ChaCha8Rng,
) -> SearchTree {
    let mut tree = SearchTree::new(state.clone());
    run_iterations(&mut tree, iterations, exploration, RolloutPolicy::Uniform, rng);
    tree
}

// ============================================================================
// PARALLEL VARIANT
// ============================================================================

/// Per-column `(reward, visits)` totals reported by one worker
type WorkerSummary = Vec<(usize, f64, u64)>;

/// Run one worker over its own tree and summarize the root children
fn worker_summary(
    root_state: GameState,
    iterations: u32,
    exploration: f64,
    rng: &mut ChaCha8Rng,
) -> WorkerSummary {
    let mut tree = SearchTree::new(root_state);
    run_iterations(
        &mut tree,
        iterations,
        exploration,
        RolloutPolicy::CenterBiased,
        rng,
    );

    let root = tree.get(NodeId::ROOT);
    root.children
        .iter()
        .zip(&root.children_move)
        .map(|(&child_id, &col)| {
            let child = tree.get(child_id);
            (col, child.reward, child.visits)
        })
        .collect()
}

/// Fan the iteration budget out over `workers` disjoint trees and merge
/// the summaries at a fresh root.
///
/// Every worker gets at least one iteration, so any non-terminal input
/// produces at least one root child after the merge.
pub(crate) fn run_parallel(
    state: &GameState,
    iterations: u32,
    exploration: f64,
    workers: usize,
    master_seed: u64,
) -> SearchTree {
    let per_worker = (iterations / workers as u32).max(1);

    let summaries: Vec<WorkerSummary> = (0..workers)
        .into_par_iter()
        .map(|worker| {
            let mut rng = ChaCha8Rng::seed_from_u64(master_seed.wrapping_add(worker as u64));
            worker_summary(state.clone(), per_worker, exploration, &mut rng)
        })
        .collect();

    merge_summaries(state, summaries)
}

/// Sum per-column statistics across workers and attach them as children
/// of a fresh root
fn merge_summaries(state: &GameState, summaries: Vec<WorkerSummary>) -> SearchTree {
    let mut merged: FxHashMap<usize, (f64, u64)> = FxHashMap::default();
    for summary in summaries {
        for (col, reward, visits) in summary {
            let entry = merged.entry(col).or_insert((0.0, 0));
            entry.0 += reward;
            entry.1 += visits;
        }
    }

    let mut columns: Vec<usize> = merged.keys().copied().collect();
    columns.sort_unstable();

    let mut tree = SearchTree::new(state.clone());
    for col in columns {
        let (reward, visits) = merged[&col];
        let mut child_state = state.clone();
        if child_state.play(col).is_err() {
            continue;
        }
        let child = tree.add_child(NodeId::ROOT, child_state, col);
        let node = tree.get_mut(child);
        node.reward = reward;
        node.visits = visits;
        tree.get_mut(NodeId::ROOT).visits += visits;
    }
    tree
}

// ============================================================================
// OUTCOME EXTRACTION
// ============================================================================

/// Read the final move choice and visit shares off the root.
///
/// The winner is the most-visited root child; ties keep the earlier
/// child. Returns None only when the root has no children.
pub(crate) fn outcome(tree: &SearchTree) -> Option<SearchOutcome> {
    let root = tree.get(NodeId::ROOT);

    let mut moves = Vec::with_capacity(root.children.len());
    for (&child_id, &col) in root.children.iter().zip(&root.children_move) {
        let child = tree.get(child_id);
        moves.push(MoveStats {
            column: col,
            visits: child.visits,
            reward: child.reward,
            share: child.visits as f64 / root.visits as f64,
        });
    }

    let mut column = None;
    let mut best_visits = 0u64;
    for stats in &moves {
        if column.is_none() || stats.visits > best_visits {
            column = Some(stats.column);
            best_visits = stats.visits;
        }
    }

    Some(SearchOutcome {
        column: column?,
        moves,
    })
}

// ============================================================================
// TESTS
// ============================================================================
