//! Minimax search with alpha-beta pruning.
//!
//! The engine explores a fixed number of plies. Max nodes are the engine's
//! turns and min nodes the opponent's; all scores are from the engine's
//! point of view. Leaves are scored with [`Board::evaluate`], decided games
//! with [`WIN_SCORE`] plus the depth still remaining when the win was
//! found, so a quicker win outranks a slower one.
//!
//! The caller's board is never touched. Each search copies it once and
//! explores on that copy with apply/undo, which visits exactly the same
//! positions as cloning the board for every move.

use std::time::Instant;

use tracing::{debug, info};

use crate::board::{Board, Move, Player};
use crate::constants::{INFINITY, WIN_SCORE};

/// Result of a root search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Best move found, `None` if the board has no legal moves
    pub best_move: Option<Move>,
    /// Minimax value of `best_move`
    pub score: i32,
    /// Positions visited below the root
    pub nodes: u64,
}

/// Alpha-beta solver playing one side at a fixed depth.
#[derive(Debug, Clone)]
pub struct Solver {
    depth: u32,
    player: Player,
    /// Number of searches run so far
    turn: u32,
    nodes: u64,
}

impl Solver {
    pub fn new(depth: u32, player: Player) -> Self {
        Self {
            depth,
            player,
            turn: 0,
            nodes: 0,
        }
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn player(&self) -> Player {
        self.player
    }

    /// Number of searches this solver has run.
    #[inline]
    pub fn turns(&self) -> u32 {
        self.turn
    }

    /// Pick the best move for the solver's side.
    ///
    /// Every root candidate is scored (no cutoff at the root) and the first
    /// candidate with the highest value wins ties, so the ordering of
    /// [`Board::legal_moves`] decides between equal moves. A depth of 0
    /// scores each candidate statically, the same as depth 1.
    pub fn search(&mut self, board: &Board) -> SearchOutcome {
        let start = Instant::now();
        self.turn += 1;
        self.nodes = 0;

        let moves = board.legal_moves();
        info!(
            turn = self.turn,
            depth = self.depth,
            candidates = moves.len(),
            player = %self.player,
            "Searching"
        );

        let mut scratch = board.clone();
        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best_value = -INFINITY;
        let mut best = None;
        let child_depth = self.depth.saturating_sub(1);

        for (i, &mv) in moves.iter().enumerate() {
            self.play(&mut scratch, mv, self.player);
            let value = self.min_node(&mut scratch, child_depth, alpha, beta);
            scratch.undo_move(mv.row, mv.col);

            debug!(
                candidate = i + 1,
                of = moves.len(),
                mv = %mv,
                value,
                "Scored root move"
            );

            if value > best_value {
                best_value = value;
                best = Some(mv);
            }
            alpha = alpha.max(best_value);
        }

        let score = match best {
            Some(_) => best_value,
            None => board.evaluate(self.player),
        };
        info!(
            turn = self.turn,
            best = ?best.map(|m| m.to_string()),
            score,
            nodes = self.nodes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Search finished"
        );

        SearchOutcome {
            best_move: best,
            score,
            nodes: self.nodes,
        }
    }

    /// Engine to move: maximise.
    fn max_node(&mut self, board: &mut Board, depth: u32, mut alpha: i32, beta: i32) -> i32 {
        if let Some(score) = self.leaf_score(board, depth) {
            return score;
        }
        let moves = board.legal_moves();
        // Full board with no winner: a draw, scored statically.
        if moves.is_empty() {
            return board.evaluate(self.player);
        }

        let mut v = -INFINITY;
        for mv in moves {
            self.play(board, mv, self.player);
            let child = self.min_node(board, depth - 1, alpha, beta);
            board.undo_move(mv.row, mv.col);

            v = v.max(child);
            if v >= beta {
                return v;
            }
            alpha = alpha.max(v);
        }
        v
    }

    /// Opponent to move: minimise.
    fn min_node(&mut self, board: &mut Board, depth: u32, alpha: i32, mut beta: i32) -> i32 {
        if let Some(score) = self.leaf_score(board, depth) {
            return score;
        }
        let moves = board.legal_moves();
        if moves.is_empty() {
            return board.evaluate(self.player);
        }

        let opponent = self.player.opponent();
        let mut v = INFINITY;
        for mv in moves {
            self.play(board, mv, opponent);
            let child = self.max_node(board, depth - 1, alpha, beta);
            board.undo_move(mv.row, mv.col);

            v = v.min(child);
            if v <= alpha {
                return v;
            }
            beta = beta.min(v);
        }
        v
    }

    /// Score of a node that ends the recursion: a decided game or depth 0.
    fn leaf_score(&self, board: &Board, depth: u32) -> Option<i32> {
        match board.winner() {
            Some(p) if p == self.player => return Some(win_score(depth)),
            Some(_) => return Some(-win_score(depth)),
            None => {}
        }
        (depth == 0).then(|| board.evaluate(self.player))
    }

    #[inline]
    fn play(&mut self, board: &mut Board, mv: Move, player: Player) {
        let placed = board.apply_move(mv.row, mv.col, player);
        debug_assert!(placed, "legal move {mv} was rejected");
        self.nodes += 1;
    }
}

/// Value of a decided game found with `depth` plies still to search.
#[inline]
pub fn win_score(depth: u32) -> i32 {
    WIN_SCORE + depth as i32
}

/// Best move for `player` searching `depth` plies, or `None` if the board
/// has no legal moves.
pub fn best_move(board: &Board, depth: u32, player: Player) -> Option<Move> {
    Solver::new(depth, player).search(board).best_move
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        Board::from_string(s).unwrap()
    }

    #[test]
    fn test_empty_board_plays_center() {
        assert_eq!(
            best_move(&Board::new(10), 1, Player::X),
            Some(Move::new(5, 5))
        );
        assert_eq!(
            best_move(&Board::new(10), 3, Player::O),
            Some(Move::new(5, 5))
        );
    }

    #[test]
    fn test_takes_immediate_win() {
        let b = board("XX.\n.O.\n...");
        assert_eq!(best_move(&b, 3, Player::X), Some(Move::new(0, 2)));
        assert_eq!(best_move(&b, 1, Player::X), Some(Move::new(0, 2)));
    }

    #[test]
    fn test_immediate_win_outranks_slower_forced_win() {
        // (1,0) also wins by force (double threat) and is tried first, but
        // (0,2) wins now.
        let b = board("XX.\n.O.\n...");
        let outcome = Solver::new(3, Player::X).search(&b);
        assert_eq!(outcome.best_move, Some(Move::new(0, 2)));
        assert_eq!(outcome.score, win_score(2));
    }

    #[test]
    fn test_blocks_opponent_win() {
        let b = board("XX.\n.O.\n...");
        assert_eq!(best_move(&b, 2, Player::O), Some(Move::new(0, 2)));
    }

    #[test]
    fn test_full_board_has_no_move() {
        let b = board("XOX\nXOO\nOXX");
        let outcome = Solver::new(3, Player::X).search(&b);
        assert_eq!(outcome.best_move, None);
        assert_eq!(outcome.nodes, 0);
        assert_eq!(outcome.score, b.evaluate(Player::X));
    }

    #[test]
    fn test_draw_inside_search_is_scored_statically() {
        // One cell left; filling it draws. Depth 4 runs past the full board.
        let b = board("XOX\nXOO\nOX.");
        let outcome = Solver::new(4, Player::X).search(&b);
        assert_eq!(outcome.best_move, Some(Move::new(2, 2)));
        let mut after = b.clone();
        after.apply_move(2, 2, Player::X);
        assert_eq!(after.winner(), None);
        assert_eq!(outcome.score, after.evaluate(Player::X));
    }

    #[test]
    fn test_search_does_not_mutate_board() {
        let b = board("X....\n.O...\n..X..\n.....\n.....");
        let before = b.clone();
        let _ = best_move(&b, 3, Player::O);
        assert_eq!(b, before);
    }

    #[test]
    fn test_turn_counter() {
        let mut solver = Solver::new(1, Player::X);
        assert_eq!(solver.turns(), 0);
        solver.search(&Board::new(5));
        solver.search(&Board::new(5));
        assert_eq!(solver.turns(), 2);
        assert_eq!(solver.depth(), 1);
        assert_eq!(solver.player(), Player::X);
    }

    #[test]
    fn test_depth_zero_matches_depth_one() {
        let b = board("X....\n.O...\n..X..\n...O.\n.....");
        assert_eq!(best_move(&b, 0, Player::X), best_move(&b, 1, Player::X));
    }
}
