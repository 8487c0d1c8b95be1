//! Position evaluators: the boundary between search and evaluation.
//!
//! The search calls [`Evaluator::evaluate`] on each non-terminal leaf and gets
//! back a value and a policy. It does not know whether the evaluator is a
//! neural network, a uniform prior, or random playouts.
//!
//! Values are always from white's point of view (+1 white wins, -1 black
//! wins). Policies are not validated: moves that are missing from the policy,
//! or that have a probability of zero or less, are simply never expanded.

use std::collections::HashMap;

use crate::movegen::Move;
use crate::position::Position;

/// Move probabilities produced by an evaluator.
pub type Policy = HashMap<Move, f64>;

/// Evaluator output for one position.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub value: f64,
    pub policy: Policy,
}

impl Evaluation {
    pub fn new(value: f64, policy: Policy) -> Self {
        Self { value, policy }
    }
}

pub trait Evaluator {
    fn evaluate(&mut self, position: &Position) -> Evaluation;
}

/// Any `FnMut(&Position) -> Evaluation` closure is an evaluator.
impl<F> Evaluator for F
where
    F: FnMut(&Position) -> Evaluation,
{
    fn evaluate(&mut self, position: &Position) -> Evaluation {
        self(position)
    }
}

/// Uniform policy over the legal moves of `position`.
pub fn uniform_policy(position: &Position) -> Policy {
    let moves = position.legal_moves();
    if moves.is_empty() {
        return Policy::new();
    }
    let p = 1.0 / moves.len() as f64;
    moves.iter().map(|&mv| (mv, p)).collect()
}

/// Evaluator with no knowledge: value 0 and a uniform policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformEvaluator;

impl Evaluator for UniformEvaluator {
    fn evaluate(&mut self, position: &Position) -> Evaluation {
        Evaluation::new(0.0, uniform_policy(position))
    }
}
