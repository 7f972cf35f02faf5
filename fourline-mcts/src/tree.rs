//! MCTS tree structure and node management
//!
//! Uses arena allocation: nodes live in a flat `Vec`, children own nothing
//! and parents are plain indices, so the whole tree drops in one free.

use fourline_core::GameState;

// ============================================================================
// TYPES
// ============================================================================

/// Node identifier (index into the arena)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

/// A node in the search tree
#[derive(Clone, Debug)]
pub struct SearchNode {
    /// Game state at this node
    pub state: GameState,
    /// Parent node (None for root)
    pub parent: Option<NodeId>,
    /// Visit count. Nodes are born with one visit, so UCB1 never divides
    /// by zero and `ln(parent.visits)` is defined on the first pass.
    pub visits: u64,
    /// Accumulated reward from the perspective of the player who moved
    /// into this node
    pub reward: f64,
    /// Child nodes, in expansion order
    pub children: Vec<NodeId>,
    /// Column played to reach each child; kept in lockstep with `children`
    pub children_move: Vec<usize>,
}

impl SearchNode {
    fn new(state: GameState, parent: Option<NodeId>) -> Self {
        Self {
            state,
            parent,
            visits: 1,
            reward: 0.0,
            children: Vec::new(),
            children_move: Vec::new(),
        }
    }
}

// ============================================================================
// SEARCH TREE
// ============================================================================

/// Arena-allocated MCTS tree
#[derive(Debug)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    /// Create a tree holding only the given root state
    pub fn new(root_state: GameState) -> Self {
        Self {
            nodes: vec![SearchNode::new(root_state, None)],
        }
    }

    pub fn get(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id.0]
    }

    /// Number of nodes in the arena
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attach a child reached by playing `column`.
    ///
    /// This is the only way children are added, so `children` and
    /// `children_move` always stay in lockstep.
    pub fn add_child(&mut self, parent: NodeId, state: GameState, column: usize) -> NodeId {
        let child = NodeId(self.nodes.len());
        self.nodes.push(SearchNode::new(state, Some(parent)));
        let node = self.get_mut(parent);
        node.children.push(child);
        node.children_move.push(column);
        child
    }

    /// Terminal nodes have no moves left to try
    pub fn is_terminal(&self, id: NodeId) -> bool {
        self.get(id).state.is_over()
    }

    /// A node is fully explored once every legal column has a child
    pub fn fully_explored(&self, id: NodeId) -> bool {
        let node = self.get(id);
        node.children.len() == node.state.legal_moves().len()
    }

    /// UCB1 child selection.
    ///
    /// Score is `reward / visits + c * sqrt(ln(parent_visits) / visits)`.
    /// Exact ties go to the child with more visits, then to the earlier
    /// child.
    pub fn best_child(&self, id: NodeId, exploration: f64) -> Option<NodeId> {
        let node = self.get(id);
        let parent_log = (node.visits as f64).ln();

        let mut best: Option<(f64, NodeId)> = None;
        for &child_id in &node.children {
            let child = self.get(child_id);
            let exploit = child.reward / child.visits as f64;
            let explore = (parent_log / child.visits as f64).sqrt();
            let score = exploit + exploration * explore;

            best = match best {
                None => Some((score, child_id)),
                Some((best_score, best_id)) => {
                    if score > best_score
                        || (score == best_score && child.visits > self.get(best_id).visits)
                    {
                        Some((score, child_id))
                    } else {
                        Some((best_score, best_id))
                    }
                }
            };
        }
        best.map(|(_, id)| id)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tree_has_single_unvisited_root() {
        let tree = SearchTree::new(GameState::new());
        assert_eq!(tree.len(), 1);
        let root = tree.get(NodeId::ROOT);
        assert_eq!(root.visits, 1);
        assert_eq!(root.reward, 0.0);
        assert!(root.parent.is_none());
    }

    #[test]
    fn test_add_child_keeps_lockstep() {
        let mut tree = SearchTree::new(GameState::new());
        let mut state = GameState::new();
        state.play(4).unwrap();

        let child = tree.add_child(NodeId::ROOT, state, 4);

        let root = tree.get(NodeId::ROOT);
        assert_eq!(root.children, vec![child]);
        assert_eq!(root.children_move, vec![4]);
        assert_eq!(tree.get(child).parent, Some(NodeId::ROOT));
    }

    #[test]
    fn test_fully_explored_lists_every_column_once() {
        let mut tree = SearchTree::new(GameState::new());
        let legal = tree.get(NodeId::ROOT).state.legal_moves();

        for (i, &col) in legal.iter().enumerate() {
            assert!(!tree.fully_explored(NodeId::ROOT));
            let mut state = tree.get(NodeId::ROOT).state.clone();
            state.play(col).unwrap();
            tree.add_child(NodeId::ROOT, state, col);
            assert_eq!(tree.get(NodeId::ROOT).children.len(), i + 1);
        }

        assert!(tree.fully_explored(NodeId::ROOT));
        let mut moves = tree.get(NodeId::ROOT).children_move.clone();
        moves.sort_unstable();
        moves.dedup();
        assert_eq!(moves, legal);
    }

    #[test]
    fn test_best_child_prefers_higher_score() {
        let mut tree = SearchTree::new(GameState::new());
        for col in [0, 1] {
            let mut state = GameState::new();
            state.play(col).unwrap();
            let id = tree.add_child(NodeId::ROOT, state, col);
            tree.get_mut(id).visits = 10;
        }
        tree.get_mut(NodeId::ROOT).visits = 21;

        let ids = tree.get(NodeId::ROOT).children.clone();
        tree.get_mut(ids[0]).reward = 2.0;
        tree.get_mut(ids[1]).reward = 8.0;

        assert_eq!(tree.best_child(NodeId::ROOT, 1.0), Some(ids[1]));
    }

    #[test]
    fn test_best_child_tie_goes_to_more_visits() {
        let mut tree = SearchTree::new(GameState::new());
        for col in [0, 1] {
            let mut state = GameState::new();
            state.play(col).unwrap();
            tree.add_child(NodeId::ROOT, state, col);
        }
        let ids = tree.get(NodeId::ROOT).children.clone();

        // Zero exploration, equal exploit ratios, unequal visit counts
        tree.get_mut(ids[0]).visits = 2;
        tree.get_mut(ids[0]).reward = 1.0;
        tree.get_mut(ids[1]).visits = 4;
        tree.get_mut(ids[1]).reward = 2.0;

        assert_eq!(tree.best_child(NodeId::ROOT, 0.0), Some(ids[1]));
    }

    #[test]
    fn test_best_child_full_tie_keeps_first() {
        let mut tree = SearchTree::new(GameState::new());
        for col in [5, 6] {
            let mut state = GameState::new();
            state.play(col).unwrap();
            tree.add_child(NodeId::ROOT, state, col);
        }
        let ids = tree.get(NodeId::ROOT).children.clone();
        assert_eq!(tree.best_child(NodeId::ROOT, 1.4), Some(ids[0]));
    }
}
