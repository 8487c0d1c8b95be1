//! Random playouts (game simulation) for position evaluation.
//!
//! A playout plays uniformly random legal moves until the game ends or a ply
//! limit is reached, then scores the result from white's point of view:
//! - a finished game scores its [`Outcome`](crate::position::Outcome) value
//! - an unfinished game scores its material advantage, scaled and clamped to
//!   [-1, 1]

use crate::constants::{MATERIAL_SCALE, ROLLOUT_MAX_PLIES, ROLLOUTS};
use crate::evaluator::{Evaluation, Evaluator, uniform_policy};
use crate::position::Position;

/// Perform one playout from `pos` and return its score (white-positive).
pub fn playout(pos: &Position, rng: &mut fastrand::Rng, max_plies: usize) -> f64 {
    let mut cur = pos.clone();
    for _ in 0..max_plies {
        if let Some(outcome) = cur.result() {
            return outcome.value();
        }
        let moves = cur.legal_moves();
        let mv = moves[rng.usize(..moves.len())];
        match cur.make_move(mv) {
            Ok(next) => cur = next,
            Err(_) => break,
        }
    }

    match cur.result() {
        Some(outcome) => outcome.value(),
        None => score_material(&cur),
    }
}

/// Score an unfinished game on material.
fn score_material(pos: &Position) -> f64 {
    (pos.material_advantage() as f64 / MATERIAL_SCALE).clamp(-1.0, 1.0)
}

/// Evaluator that averages random playouts and proposes a uniform policy.
pub struct RolloutEvaluator {
    rng: fastrand::Rng,
    rollouts: usize,
    max_plies: usize,
}

impl Default for RolloutEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl RolloutEvaluator {
    pub fn new() -> Self {
        Self::with_rng(fastrand::Rng::new())
    }

    /// Create an evaluator whose playouts are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(fastrand::Rng::with_seed(seed))
    }

    fn with_rng(rng: fastrand::Rng) -> Self {
        Self {
            rng,
            rollouts: ROLLOUTS,
            max_plies: ROLLOUT_MAX_PLIES,
        }
    }

    /// Set the number of playouts averaged per evaluation (at least one).
    pub fn rollouts(mut self, rollouts: usize) -> Self {
        self.rollouts = rollouts.max(1);
        self
    }

    /// Set the ply limit after which a playout is scored on material.
    pub fn max_plies(mut self, max_plies: usize) -> Self {
        self.max_plies = max_plies;
        self
    }
}

impl Evaluator for RolloutEvaluator {
    fn evaluate(&mut self, position: &Position) -> Evaluation {
        let total: f64 = (0..self.rollouts)
            .map(|_| playout(position, &mut self.rng, self.max_plies))
            .sum();
        Evaluation::new(total / self.rollouts as f64, uniform_policy(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;

    #[test]
    fn test_playout_terminal_position() {
        let pos = Position::from_board(
            "|k|.|.|R|
             |.|.|.|.|
             |.|K|.|.|
             |.|.|.|.|
             |.|.|.|.|
             |.|.|.|.|
             |.|.|.|.|
             |.|.|.|.|"
                .parse()
                .unwrap(),
            Color::Black,
        );
        let mut rng = fastrand::Rng::with_seed(7);
        assert_eq!(playout(&pos, &mut rng, ROLLOUT_MAX_PLIES), 1.0);
    }

    #[test]
    fn test_playout_zero_plies_scores_material() {
        let pos = Position::from_board(
            "|.|.|.|k|
             |.|.|.|.|
             |.|.|.|.|
             |.|.|.|.|
             |.|R|.|.|
             |.|.|.|.|
             |P|.|.|.|
             |K|.|.|.|"
                .parse()
                .unwrap(),
            Color::White,
        );
        let mut rng = fastrand::Rng::with_seed(7);
        assert_eq!(playout(&pos, &mut rng, 0), 0.6);
    }

    #[test]
    fn test_rollout_evaluator_is_reproducible() {
        let pos = Position::new();
        let a = RolloutEvaluator::with_seed(42).rollouts(3).evaluate(&pos);
        let b = RolloutEvaluator::with_seed(42).rollouts(3).evaluate(&pos);
        assert_eq!(a.value, b.value);
        assert!((-1.0..=1.0).contains(&a.value));
        assert_eq!(a.policy.len(), pos.legal_moves().len());
    }
}
