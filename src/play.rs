//! Line-oriented play engine.
//!
//! Reads one command per line and answers with `= <message>` on success or
//! `? <message>` on failure.
//!
//! ## Supported Commands
//!
//! - `r c r c` or `r c r c r c` - Play a move, optionally with a bonus capture
//! - `moves` - List the legal moves
//! - `board` - Show the board, material and side to move
//! - `go` - Search and play a move for the side to move
//! - `new` - Reset to the starting position
//! - `help` - List the commands
//! - `quit` - Exit the loop
//!
//! ## Example
//!
//! ```
//! use half_chess::evaluator::UniformEvaluator;
//! use half_chess::play::PlayEngine;
//!
//! let mut engine = PlayEngine::with_simulations(UniformEvaluator, 50);
//! let (ok, _) = engine.execute("6 0 5 0");
//! assert!(ok);
//! let (ok, reply) = engine.execute("go");
//! assert!(ok, "{reply}");
//! ```

use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::constants::N_SIMS;
use crate::evaluator::Evaluator;
use crate::mcts::{Node, dump_children, tree_search, tree_search_verbose};
use crate::movegen::Move;
use crate::position::Position;

const HELP: &str = "\
r c r c       play a move (origin, destination)
r c r c r c   play a promotion that also removes the piece on the last square
moves         list the legal moves
board         show the board
go            let the engine move
new           start a new game
help          show this text
quit          exit";

/// Play engine state.
pub struct PlayEngine<E: Evaluator> {
    pos: Position,
    evaluator: E,
    n_sims: usize,
    verbose: bool,
}

impl<E: Evaluator> PlayEngine<E> {
    pub fn new(evaluator: E) -> Self {
        Self::with_simulations(evaluator, N_SIMS)
    }

    /// Create an engine that runs `n_sims` simulations per `go`.
    pub fn with_simulations(evaluator: E, n_sims: usize) -> Self {
        Self {
            pos: Position::new(),
            evaluator,
            n_sims,
            verbose: false,
        }
    }

    /// Print search progress and root statistics to stderr.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn position(&self) -> &Position {
        &self.pos
    }

    /// Run the command loop, reading from stdin and writing to stdout.
    pub fn run(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();

        writeln!(stdout, "{}", self.pos)?;
        for line in stdin.lock().lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (success, message) = self.execute(line);
            let prefix = if success { '=' } else { '?' };
            writeln!(stdout, "{prefix} {message}\n")?;
            stdout.flush()?;

            if line.eq_ignore_ascii_case("quit") {
                break;
            }
        }
        Ok(())
    }

    /// Execute one command line and return (success, response).
    pub fn execute(&mut self, line: &str) -> (bool, String) {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(first) = parts.first() else {
            return (false, "empty command".to_string());
        };

        match first.to_lowercase().as_str() {
            "quit" => (true, String::new()),
            "help" => (true, HELP.to_string()),
            "new" => {
                self.pos = Position::new();
                (true, self.pos.to_string())
            }
            "board" => (true, self.describe()),
            "moves" => {
                let moves: Vec<String> = self.pos.legal_moves().iter().map(Move::to_string).collect();
                (true, moves.join(" "))
            }
            "go" => self.engine_move(),
            _ if first.parse::<usize>().is_ok() => match parse_move(&parts) {
                Some(mv) => self.play(mv),
                None => (false, "expected 4 or 6 integers".to_string()),
            },
            cmd => (false, format!("unknown command: {cmd}")),
        }
    }

    fn describe(&self) -> String {
        format!(
            "{}material {:+}, {} to move",
            self.pos,
            self.pos.material_advantage(),
            self.pos.side_to_move()
        )
    }

    fn play(&mut self, mv: Move) -> (bool, String) {
        if let Some(outcome) = self.pos.result() {
            return (false, format!("game over: {outcome}"));
        }
        match self.pos.make_move(mv) {
            Ok(next) => {
                self.pos = next;
                (true, self.after_move(mv))
            }
            Err(err) => (false, err.to_string()),
        }
    }

    fn engine_move(&mut self) -> (bool, String) {
        if let Some(outcome) = self.pos.result() {
            return (false, format!("game over: {outcome}"));
        }

        // Fresh tree for every search
        let mut root = Node::root(self.pos.clone());
        let best = if self.verbose {
            tree_search_verbose(&mut root, &mut self.evaluator, self.n_sims)
        } else {
            tree_search(&mut root, &mut self.evaluator, self.n_sims)
        };
        if self.verbose {
            dump_children(&root);
        }

        let Some(mv) = best else {
            return (false, "no move found".to_string());
        };
        self.play(mv)
    }

    fn after_move(&self, mv: Move) -> String {
        let mut reply = format!("{mv}\n{}", self.pos);
        if let Some(outcome) = self.pos.result() {
            reply.push_str(&format!("game over: {outcome}"));
        }
        reply
    }
}

/// Parse `r c r c` or `r c r c r c`.
fn parse_move(parts: &[&str]) -> Option<Move> {
    let nums: Vec<usize> = parts
        .iter()
        .map(|p| p.parse().ok())
        .collect::<Option<_>>()?;
    match nums.as_slice() {
        &[fr, fc, tr, tc] => Some(Move::new(fr, fc, tr, tc)),
        &[fr, fc, tr, tc, br, bc] => Some(Move::with_bonus(fr, fc, tr, tc, br, bc)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;
    use crate::evaluator::UniformEvaluator;

    fn engine() -> PlayEngine<UniformEvaluator> {
        PlayEngine::with_simulations(UniformEvaluator, 50)
    }

    #[test]
    fn test_parse_move() {
        assert_eq!(parse_move(&["6", "0", "5", "0"]), Some(Move::new(6, 0, 5, 0)));
        assert_eq!(
            parse_move(&["1", "0", "0", "0", "4", "2"]),
            Some(Move::with_bonus(1, 0, 0, 0, 4, 2))
        );
        assert_eq!(parse_move(&["6", "0", "5"]), None);
        assert_eq!(parse_move(&["6", "0", "5", "x"]), None);
        assert_eq!(parse_move(&["6", "0", "5", "-1"]), None);
    }

    #[test]
    fn test_play_and_new() {
        let mut engine = engine();
        let (success, reply) = engine.execute("6 0 5 0");
        assert!(success);
        assert!(reply.starts_with("(60, 50)"));
        assert_eq!(engine.position().side_to_move(), Color::Black);

        let (success, _) = engine.execute("new");
        assert!(success);
        assert_eq!(engine.position(), &Position::new());
    }

    #[test]
    fn test_illegal_input_keeps_position() {
        let mut engine = engine();
        let (success, reply) = engine.execute("7 0 5 0");
        assert!(!success);
        assert_eq!(reply, "illegal move (70, 50)");

        let (success, _) = engine.execute("6 0 5 9");
        assert!(!success);
        let (success, _) = engine.execute("6 0");
        assert!(!success);
        let (success, reply) = engine.execute("castle");
        assert!(!success);
        assert_eq!(reply, "unknown command: castle");

        assert_eq!(engine.position(), &Position::new());
    }

    #[test]
    fn test_moves_and_board() {
        let mut engine = engine();
        let (success, reply) = engine.execute("moves");
        assert!(success);
        assert_eq!(reply.split(") (").count(), 6);

        let (success, reply) = engine.execute("BOARD");
        assert!(success);
        assert!(reply.starts_with("|r|n|k|b|"));
        assert!(reply.ends_with("material +0, white to move"));
    }

    #[test]
    fn test_go_plays_a_move() {
        let mut engine = engine();
        let (success, reply) = engine.execute("go");
        assert!(success, "{reply}");
        assert_eq!(engine.position().side_to_move(), Color::Black);
    }

    #[test]
    fn test_game_over_is_reported() {
        let board = "|k|.|.|.|
                     |.|.|.|.|
                     |.|K|.|.|
                     |.|.|.|.|
                     |.|.|.|R|
                     |.|.|.|.|
                     |.|.|.|.|
                     |.|.|.|.|"
            .parse()
            .unwrap();
        let mut engine = engine();
        engine.pos = Position::from_board(board, Color::White);

        let (success, reply) = engine.execute("4 3 0 3");
        assert!(success);
        assert!(reply.ends_with("game over: white wins"));

        let (success, reply) = engine.execute("go");
        assert!(!success);
        assert_eq!(reply, "game over: white wins");
    }
}
