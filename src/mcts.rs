//! Monte Carlo Tree Search (MCTS) driven by an external evaluator.
//!
//! Each simulation:
//! - descends from the root through the child with the highest UCB score
//!   until it reaches a node without children
//! - scores that leaf, either from the game result or by asking the
//!   [`Evaluator`] for a value and a policy (and expanding the leaf with it)
//! - adds the value and one visit to every node on the path, root included
//!
//! Values are white-positive and are never negated between plies.

use crate::constants::REPORT_PERIOD;
use crate::evaluator::{Evaluator, Policy};
use crate::movegen::Move;
use crate::position::Position;

/// A node in the MCTS search tree.
///
/// Children are kept in the order of the parent's legal-move list.
#[derive(Debug, Clone)]
pub struct Node {
    /// The game position at this node
    pub position: Position,
    /// Probability given to this node's move by the parent's policy
    pub prior: f64,
    /// Sum of backpropagated values
    pub value: f64,
    /// Number of visits
    pub visits: u32,
    /// Child nodes, keyed by the move leading to them
    pub children: Vec<(Move, Node)>,
}

impl Node {
    pub fn new(position: Position, prior: f64) -> Self {
        Self {
            position,
            prior,
            value: 0.0,
            visits: 0,
            children: Vec::new(),
        }
    }

    /// A search root for `position`.
    pub fn root(position: Position) -> Self {
        Self::new(position, 1.0)
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Average backpropagated value, or 0 for an unvisited node.
    #[inline]
    pub fn mean_value(&self) -> f64 {
        if self.visits > 0 {
            self.value / self.visits as f64
        } else {
            0.0
        }
    }

    /// Create one child per legal move with a strictly positive probability.
    ///
    /// Policy entries for moves that are not legal here are ignored. Does
    /// nothing if the node already has children.
    pub fn expand(&mut self, policy: &Policy) {
        if !self.children.is_empty() {
            return;
        }
        for &mv in self.position.legal_moves() {
            let Some(&prior) = policy.get(&mv) else {
                continue;
            };
            if prior <= 0.0 {
                continue;
            }
            let child = self.position.successor(mv);
            self.children.push((mv, Node::new(child, prior)));
        }
    }

    /// UCB score of `child` seen from this node.
    pub fn ucb_score(&self, child: &Node) -> f64 {
        let exploration =
            child.prior * (self.visits as f64).sqrt() / (child.visits as f64 + 1.0);
        child.mean_value() + exploration
    }

    /// Index of the child with the highest UCB score.
    ///
    /// On equal scores the later child wins. Returns `None` for a leaf.
    pub fn select_child(&self) -> Option<usize> {
        let mut best = None;
        let mut best_score = f64::NEG_INFINITY;
        for (i, (_, child)) in self.children.iter().enumerate() {
            let score = self.ucb_score(child);
            if best.is_none() || score >= best_score {
                best = Some(i);
                best_score = score;
            }
        }
        best
    }

    /// Each child's share of the children's total visits.
    pub fn visit_distribution(&self) -> Vec<(Move, f64)> {
        let total: u32 = self.children.iter().map(|(_, c)| c.visits).sum();
        self.children
            .iter()
            .map(|(mv, c)| {
                let share = if total > 0 {
                    c.visits as f64 / total as f64
                } else {
                    0.0
                };
                (*mv, share)
            })
            .collect()
    }

    fn record(&mut self, value: f64) {
        self.value += value;
        self.visits += 1;
    }
}

/// Descend through the tree to a leaf, returning the child indices taken.
fn tree_descend(root: &Node) -> Vec<usize> {
    let mut path = Vec::new();
    let mut node = root;
    while let Some(idx) = node.select_child() {
        path.push(idx);
        node = &node.children[idx].1;
    }
    path
}

fn node_at_mut<'a>(root: &'a mut Node, path: &[usize]) -> &'a mut Node {
    path.iter()
        .fold(root, |node, &idx| &mut node.children[idx].1)
}

/// Add `value` and one visit to the root and every node along `path`.
fn tree_update(root: &mut Node, path: &[usize], value: f64) {
    root.record(value);
    let mut node = root;
    for &idx in path {
        node = &mut node.children[idx].1;
        node.record(value);
    }
}

/// Run one simulation from `root` and return the value it backpropagated.
pub fn simulate<E>(root: &mut Node, evaluator: &mut E) -> f64
where
    E: Evaluator + ?Sized,
{
    let path = tree_descend(root);
    let leaf = node_at_mut(root, &path);
    let value = match leaf.position.result() {
        Some(outcome) => outcome.value(),
        None => {
            let evaluation = evaluator.evaluate(&leaf.position);
            leaf.expand(&evaluation.policy);
            evaluation.value
        }
    };
    tree_update(root, &path, value);
    value
}

/// Run `sims` simulations from `root` and return the most visited move.
///
/// Returns `None` if the root has no children afterwards (a finished game,
/// or an evaluator that gave no legal move a positive probability).
pub fn tree_search<E>(root: &mut Node, evaluator: &mut E, sims: usize) -> Option<Move>
where
    E: Evaluator + ?Sized,
{
    search(root, evaluator, sims, false)
}

/// Like [`tree_search`], with a progress line on stderr every
/// [`REPORT_PERIOD`] simulations.
pub fn tree_search_verbose<E>(root: &mut Node, evaluator: &mut E, sims: usize) -> Option<Move>
where
    E: Evaluator + ?Sized,
{
    search(root, evaluator, sims, true)
}

fn search<E>(root: &mut Node, evaluator: &mut E, sims: usize, verbose: bool) -> Option<Move>
where
    E: Evaluator + ?Sized,
{
    for i in 1..=sims {
        simulate(root, evaluator);

        if verbose && i % REPORT_PERIOD == 0 {
            report_progress(root, i);
        }
    }
    best_move(root)
}

fn report_progress(root: &Node, sims_done: usize) {
    match best_child(root) {
        Some((mv, child)) => eprintln!(
            "[{sims_done:>5}] best {mv} visits={} mean={:.3}",
            child.visits,
            child.mean_value()
        ),
        None => eprintln!("[{sims_done:>5}] no children"),
    }
}

/// Most visited root child; the earlier child wins on equal visits.
fn best_child(root: &Node) -> Option<(Move, &Node)> {
    let mut best: Option<(Move, &Node)> = None;
    for (mv, child) in &root.children {
        if best.is_none_or(|(_, b)| child.visits > b.visits) {
            best = Some((*mv, child));
        }
    }
    best
}

/// The move of the most visited root child.
pub fn best_move(root: &Node) -> Option<Move> {
    best_child(root).map(|(mv, _)| mv)
}

/// Print debug information about the root's children.
pub fn dump_children(root: &Node) {
    for (mv, child) in &root.children {
        eprintln!(
            "move {mv} visits={} mean={:.3} prior={:.3} ucb={:.3}",
            child.visits,
            child.mean_value(),
            child.prior,
            root.ucb_score(child)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;
    use crate::evaluator::{Evaluation, UniformEvaluator};

    fn position(text: &str, side: Color) -> Position {
        Position::from_board(text.parse().expect("valid diagram"), side)
    }

    fn leaf(prior: f64, value: f64, visits: u32) -> Node {
        let mut node = Node::new(Position::new(), prior);
        node.value = value;
        node.visits = visits;
        node
    }

    #[test]
    fn test_ucb_tie_goes_to_later_child() {
        let mut root = Node::root(Position::new());
        root.visits = 4;
        root.children = vec![
            (Move::new(6, 0, 5, 0), leaf(0.5, 0.0, 0)),
            (Move::new(6, 1, 5, 1), leaf(0.5, 0.0, 0)),
            (Move::new(6, 2, 5, 2), leaf(0.5, 0.0, 0)),
        ];
        assert_eq!(root.select_child(), Some(2));

        // A strictly better earlier child still wins.
        root.children[0].1.prior = 0.9;
        assert_eq!(root.select_child(), Some(0));
    }

    #[test]
    fn test_ucb_score() {
        let mut root = Node::root(Position::new());
        root.visits = 16;
        let child = leaf(0.25, 1.5, 3);
        // 1.5 / 3 + 0.25 * 4 / 4
        assert!((root.ucb_score(&child) - 0.75).abs() < 1e-12);
        assert_eq!(Node::root(Position::new()).select_child(), None);
    }

    #[test]
    fn test_expand_skips_non_positive_and_unknown_moves() {
        let mut root = Node::root(Position::new());
        let mut policy = Policy::new();
        policy.insert(Move::new(6, 0, 5, 0), 0.5);
        policy.insert(Move::new(6, 1, 5, 1), 0.0);
        policy.insert(Move::new(6, 2, 5, 2), -1.0);
        policy.insert(Move::new(7, 0, 3, 0), 0.9);
        policy.insert(Move::new(6, 3, 5, 3), 0.25);
        root.expand(&policy);

        let moves: Vec<Move> = root.children.iter().map(|(mv, _)| *mv).collect();
        assert_eq!(moves, vec![Move::new(6, 0, 5, 0), Move::new(6, 3, 5, 3)]);
        assert_eq!(root.children[1].1.prior, 0.25);
        assert_eq!(root.children[0].1.position.side_to_move(), Color::Black);

        // Children match playing the move.
        let played = Position::new().make_move(Move::new(6, 3, 5, 3)).unwrap();
        assert_eq!(root.children[1].1.position, played);

        // Expanding twice keeps the first children.
        root.expand(&UniformEvaluator.evaluate(&Position::new()).policy);
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn test_backpropagation_single_child() {
        let mut root = Node::root(Position::new());
        let only = Move::new(6, 0, 5, 0);
        let mut policy = Policy::new();
        policy.insert(only, 1.0);
        root.expand(&policy);
        assert_eq!(root.children.len(), 1);

        let mut eval = |_: &Position| Evaluation::new(0.25, Policy::new());
        let value = simulate(&mut root, &mut eval);
        assert_eq!(value, 0.25);
        assert_eq!(root.visits, 1);
        assert_eq!(root.value, 0.25);
        let child = &root.children[0].1;
        assert_eq!(child.visits, 1);
        assert_eq!(child.value, 0.25);
    }

    #[test]
    fn test_terminal_leaf_skips_evaluator() {
        let mate = position(
            "|k|.|.|R|
             |.|.|.|.|
             |.|K|.|.|
             |.|.|.|.|
             |.|.|.|.|
             |.|.|.|.|
             |.|.|.|.|
             |.|.|.|.|",
            Color::Black,
        );
        let mut root = Node::root(mate);
        let mut calls = 0;
        let mut eval = |p: &Position| {
            calls += 1;
            UniformEvaluator.evaluate(p)
        };
        for _ in 0..3 {
            assert_eq!(simulate(&mut root, &mut eval), 1.0);
        }
        assert_eq!(calls, 0);
        assert_eq!(root.visits, 3);
        assert_eq!(root.value, 3.0);
        assert!(root.is_leaf());
        assert_eq!(best_move(&root), None);
    }

    #[test]
    fn test_finds_mate_in_one() {
        let pos = position(
            "|k|.|.|.|
             |.|.|.|.|
             |.|K|.|.|
             |.|.|.|.|
             |.|.|.|R|
             |.|.|.|.|
             |.|.|.|.|
             |.|.|.|.|",
            Color::White,
        );
        let mut root = Node::root(pos);
        let best = tree_search(&mut root, &mut UniformEvaluator, 400);
        assert_eq!(best, Some(Move::new(4, 3, 0, 3)));
        assert_eq!(root.visits, 400);

        let total: f64 = root.visit_distribution().iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_move_prefers_earlier_on_equal_visits() {
        let mut root = Node::root(Position::new());
        root.children = vec![
            (Move::new(6, 0, 5, 0), leaf(0.5, 0.0, 3)),
            (Move::new(6, 1, 5, 1), leaf(0.5, 0.0, 3)),
        ];
        assert_eq!(best_move(&root), Some(Move::new(6, 0, 5, 0)));
    }
}
