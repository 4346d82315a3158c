//! Constants for scoring, board geometry and game defaults.
//!
//! Board size is chosen at runtime, so unlike a fixed-size engine nothing
//! here depends on N. Everything that does depend on it (win length,
//! center point) is derived by [`crate::board::Board`].

// =============================================================================
// Scoring
// =============================================================================

/// Score of a decided game from the engine's point of view.
///
/// Must dominate every finite value [`crate::board::Board::evaluate`] can
/// return, which is bounded by the number of windows on the board.
pub const WIN_SCORE: i32 = 100_000;

/// Stand-in for an unbounded alpha/beta. Negating it stays in range.
pub const INFINITY: i32 = i32::MAX;

// =============================================================================
// Board Geometry
// =============================================================================

/// Boards smaller than this play three in a row; larger ones play five.
pub const LONG_LINE_MIN_SIZE: usize = 5;

/// Win length on boards smaller than [`LONG_LINE_MIN_SIZE`].
pub const SHORT_WIN_LEN: usize = 3;

/// Win length on boards of at least [`LONG_LINE_MIN_SIZE`].
pub const LONG_WIN_LEN: usize = 5;

/// Line directions as (row, col) steps: horizontal, vertical, `\`, `/`.
pub const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Offsets to the 8 neighbours of a cell.
/// Order: N, NE, E, SE, S, SW, W, NW
pub const NEIGHBORS: [(isize, isize); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

// =============================================================================
// Game Defaults
// =============================================================================

/// Default board size (NxN).
pub const DEFAULT_SIZE: usize = 10;

/// Default search depth in plies.
pub const DEFAULT_DEPTH: u32 = 3;

/// Shallowest depth accepted for interactive play.
pub const MIN_DEPTH: u32 = 3;

/// Deepest depth accepted for interactive play.
pub const MAX_DEPTH: u32 = 5;

// =============================================================================
// Rendering
// =============================================================================

/// ANSI escape for X stones (red).
pub const ANSI_X: &str = "\x1b[91m";

/// ANSI escape for O stones (blue).
pub const ANSI_O: &str = "\x1b[94m";

/// ANSI reset.
pub const ANSI_RESET: &str = "\x1b[0m";
