//! Half-chess: a Monte Carlo Tree Search engine for chess on an 8x4 board.
//!
//! Each side has a rook, knight, king, bishop and four pawns. There is no
//! queen, no castling and no en-passant. A pawn that reaches the far rank
//! vanishes, and may take one enemy non-king piece anywhere on the board
//! with it.
//!
//! ## Modules
//!
//! - [`constants`] - Board geometry, encoding sizes and search parameters
//! - [`board`] - Pieces and the 8x4 grid
//! - [`movegen`] - Moves, move generation and attack detection
//! - [`position`] - Immutable positions, move execution and game results
//! - [`evaluator`] - The value/policy interface the search calls
//! - [`playout`] - Random game simulation for position evaluation
//! - [`mcts`] - Monte Carlo Tree Search with UCB selection
//! - [`encoding`] - Action codes and board tensors for learned evaluators
//! - [`play`] - Line-oriented play engine
//!
//! ## Example
//!
//! ```
//! use half_chess::evaluator::UniformEvaluator;
//! use half_chess::mcts::{Node, tree_search};
//! use half_chess::movegen::Move;
//! use half_chess::position::Position;
//!
//! // Create a new game and push a pawn
//! let pos = Position::new();
//! let pos = pos.make_move(Move::new(6, 0, 5, 0)).expect("legal opening move");
//!
//! // Run MCTS to find black's reply
//! let mut root = Node::root(pos);
//! let best = tree_search(&mut root, &mut UniformEvaluator, 100);
//! println!("Best move: {}", best.expect("black has moves"));
//! ```

pub mod board;
pub mod constants;
pub mod encoding;
pub mod evaluator;
pub mod mcts;
pub mod movegen;
pub mod play;
pub mod playout;
pub mod position;
