//! Constants for board geometry, encoding sizes, and search parameters.
//!
//! The board is 8 rows by 4 columns. Row 0 is black's back rank and row 7 is
//! white's back rank, so white pawns advance towards row 0 and black pawns
//! towards row 7.

// =============================================================================
// Board Geometry
// =============================================================================

/// Number of ranks on the board.
pub const ROWS: usize = 8;

/// Number of files on the board.
pub const COLS: usize = 4;

/// Rank on which a white pawn promotes (and vanishes).
pub const WHITE_PROMOTION_ROW: usize = 0;

/// Rank on which a black pawn promotes (and vanishes).
pub const BLACK_PROMOTION_ROW: usize = ROWS - 1;

// =============================================================================
// Network Boundary Formats
// =============================================================================

/// Codes below this value are plain moves; codes at or above it carry a bonus capture.
pub const PROMOTION_ACTION_OFFSET: usize = 1024;

/// Size of the action space (plain moves + bonus-capture promotions).
pub const NUM_ACTIONS: usize = PROMOTION_ACTION_OFFSET + COLS * ROWS * COLS * 3 * 2;

/// Planes in the board tensor: 10 one-hot piece planes plus the side-to-move plane.
pub const NUM_PLANES: usize = 11;

/// Index of the side-to-move plane.
pub const SIDE_TO_MOVE_PLANE: usize = 10;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Default number of simulations per move.
pub const N_SIMS: usize = 800;

/// Progress report period (number of simulations between verbose reports).
pub const REPORT_PERIOD: usize = 200;

// =============================================================================
// Playout Parameters
// =============================================================================

/// Default number of random playouts averaged per evaluation.
pub const ROLLOUTS: usize = 4;

/// Plies after which an unfinished playout is scored on material.
pub const ROLLOUT_MAX_PLIES: usize = 60;

/// Material advantage that maps to a full win when scoring an unfinished playout.
pub const MATERIAL_SCALE: f64 = 10.0;
