use log::{debug, info};

use crate::board::{BOARD_SIZE, Board, DIRECTIONS, NUM_SQUARES, mask_to_indices};
use crate::error::MoveError;
use crate::types::{
    GameResult, GameSnapshot, PieceCounts, Player, Position, TurnOutcome, Winner,
};

/// Rules engine state for one game of Othello.
///
/// Every rule operation reads or mutates this value only; there is no
/// ambient state. `piece_counts` is derived from `board` after every change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    turn: Player,
    skipped: bool,
    over: bool,
    piece_counts: PieceCounts,
    flipped: Vec<u8>,
}

impl GameState {
    /// Standard starting position with black to move.
    pub fn new() -> Self {
        Self::from_board(Board::new(), Player::Black)
    }

    /// Constructed position. Does not run the turn state machine; call
    /// [`GameState::settle_turn`] to resolve passes or termination.
    pub fn from_board(board: Board, turn: Player) -> Self {
        Self {
            piece_counts: board.count(),
            board,
            turn,
            skipped: false,
            over: false,
            flipped: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    /// True while the most recent turn change was a forced pass.
    pub fn skipped(&self) -> bool {
        self.skipped
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn piece_counts(&self) -> PieceCounts {
        self.piece_counts
    }

    /// Squares flipped by the last applied move, row-major indices.
    pub fn flipped(&self) -> &[u8] {
        &self.flipped
    }

    /// Whether the mover may place a piece on (x, y).
    pub fn is_legal_move(&self, x: usize, y: usize) -> bool {
        if x >= BOARD_SIZE || y >= BOARD_SIZE {
            return false;
        }
        if self.board.is_occupied(x, y) {
            return false;
        }
        if !self.board.has_occupied_neighbor(x, y) {
            return false;
        }
        DIRECTIONS
            .iter()
            .any(|&(dx, dy)| self.probe_capture(x, y, dx, dy))
    }

    /// Whether the line from (x, y) towards (dx, dy) is a capturing line.
    pub fn probe_capture(&self, x: usize, y: usize, dx: i32, dy: i32) -> bool {
        self.board.capture_run(x, y, dx, dy, self.turn) != 0
    }

    /// Flips the capturing line from (x, y) towards (dx, dy).
    /// Returns how many pieces were flipped (0 if the line does not capture).
    pub fn apply_capture(&mut self, x: usize, y: usize, dx: i32, dy: i32) -> usize {
        let run = self.capture(x, y, dx, dy);
        if run != 0 {
            self.piece_counts = self.board.count();
        }
        run.count_ones() as usize
    }

    /// Places the mover's piece on (x, y) and flips every capturing line.
    ///
    /// Caller contract: `is_legal_move(x, y)` must hold. The turn is not
    /// advanced; use [`GameState::play`] for a full checked turn.
    pub fn apply_move(&mut self, x: usize, y: usize) {
        debug_assert!(
            self.is_legal_move(x, y),
            "apply_move() requires a legal square"
        );

        let mover = self.turn;
        self.board.set(x, y, mover);

        let mut flipped = 0u64;
        for (dx, dy) in DIRECTIONS {
            flipped |= self.capture(x, y, dx, dy);
        }

        self.flipped = mask_to_indices(flipped);
        self.piece_counts = self.board.count();

        debug!(
            "{mover:?} played ({x}, {y}), flipped {}; black: {}, white: {}",
            self.flipped.len(),
            self.piece_counts.black,
            self.piece_counts.white
        );
    }

    pub fn has_any_legal_move(&self) -> bool {
        (0..NUM_SQUARES).any(|pos| self.is_legal_move(pos % BOARD_SIZE, pos / BOARD_SIZE))
    }

    /// Legal squares for the mover in row-major order.
    pub fn legal_moves(&self) -> Vec<Position> {
        (0..NUM_SQUARES)
            .map(|pos| (pos % BOARD_SIZE, pos / BOARD_SIZE))
            .filter(|&(x, y)| self.is_legal_move(x, y))
            .map(|(x, y)| Position::new(x as u8, y as u8))
            .collect()
    }

    /// Resolves forced passes and termination for the side now to move.
    ///
    /// Runs at most two rounds: a second player without a move either ends
    /// the game through `skipped` or the board is full.
    pub fn settle_turn(&mut self) -> TurnOutcome {
        if self.over {
            return TurnOutcome::GameOver(self.determine_winner());
        }

        let mut passed = None;
        loop {
            if self.has_any_legal_move() {
                return match passed {
                    Some(player) => TurnOutcome::Passed { player },
                    None => TurnOutcome::Continue,
                };
            }

            if self.skipped || self.piece_counts.total() as usize == NUM_SQUARES {
                self.over = true;
                let winner = self.determine_winner();
                info!(
                    "game over ({winner:?}); black: {}, white: {}",
                    self.piece_counts.black, self.piece_counts.white
                );
                return TurnOutcome::GameOver(winner);
            }

            info!("{:?} has no legal moves, skipping to the next turn", self.turn);
            passed = Some(self.turn);
            self.skipped = true;
            self.flipped.clear();
            self.turn = self.turn.opponent();
        }
    }

    /// Checked full turn: validate, apply, advance, settle.
    pub fn play(&mut self, x: usize, y: usize) -> Result<TurnOutcome, MoveError> {
        if self.over {
            return Err(MoveError::GameOver);
        }
        if x >= BOARD_SIZE || y >= BOARD_SIZE {
            return Err(MoveError::OutOfRange { x, y });
        }
        if !self.is_legal_move(x, y) {
            return Err(MoveError::Illegal { x, y });
        }

        self.apply_move(x, y);
        self.skipped = false;
        self.turn = self.turn.opponent();

        Ok(self.settle_turn())
    }

    /// Only meaningful once the game is over.
    pub fn determine_winner(&self) -> Winner {
        Winner::from_counts(self.piece_counts)
    }

    pub fn to_snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            board: self.board.to_array().to_vec(),
            turn: self.turn,
            black_count: self.piece_counts.black,
            white_count: self.piece_counts.white,
            skipped: self.skipped,
            is_game_over: self.over,
            flipped: self.flipped.clone(),
        }
    }

    pub fn to_result(&self) -> GameResult {
        GameResult {
            winner: self.determine_winner(),
            black_count: self.piece_counts.black,
            white_count: self.piece_counts.white,
        }
    }

    fn capture(&mut self, x: usize, y: usize, dx: i32, dy: i32) -> u64 {
        let run = self.board.capture_run(x, y, dx, dy, self.turn);
        if run != 0 {
            self.board.flip(run, self.turn);
        }
        run
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{bit, idx};
    use crate::types::Cell;

    const FULL_BOARD: u64 = u64::MAX;

    #[test]
    fn initial_state_is_correct() {
        let state = GameState::new();

        assert_eq!(state.turn(), Player::Black);
        assert_eq!(state.piece_counts(), PieceCounts { black: 2, white: 2 });
        assert!(!state.is_over());
        assert!(!state.skipped());
        assert!(state.flipped().is_empty());

        let occupied: Vec<(usize, usize, Cell)> = (0..NUM_SQUARES)
            .map(|pos| (pos % 8, pos / 8))
            .filter(|&(x, y)| state.board().is_occupied(x, y))
            .map(|(x, y)| (x, y, state.board().cell(x, y)))
            .collect();
        assert_eq!(
            occupied,
            vec![
                (3, 3, Cell::White),
                (4, 3, Cell::Black),
                (3, 4, Cell::Black),
                (4, 4, Cell::White),
            ]
        );
    }

    #[test]
    fn initial_black_legal_moves_are_four_expected_squares() {
        let state = GameState::new();

        assert_eq!(
            state.legal_moves(),
            vec![
                Position::new(3, 2),
                Position::new(2, 3),
                Position::new(5, 4),
                Position::new(4, 5),
            ]
        );
    }

    #[test]
    fn squares_without_occupied_neighbor_are_never_legal() {
        let state = GameState::new();

        for pos in 0..NUM_SQUARES {
            let (x, y) = (pos % 8, pos / 8);
            if !state.board().has_occupied_neighbor(x, y) {
                assert!(!state.is_legal_move(x, y), "({x}, {y})");
            }
        }
    }

    #[test]
    fn occupied_and_out_of_range_squares_are_illegal() {
        let state = GameState::new();

        assert!(!state.is_legal_move(3, 3));
        assert!(!state.is_legal_move(8, 0));
        assert!(!state.is_legal_move(0, 8));
    }

    #[test]
    fn placing_next_to_own_pieces_only_is_illegal() {
        let mut board = Board::empty();
        board.set(3, 3, Player::Black);
        board.set(4, 3, Player::Black);
        // Lone white piece: every line through it ends on an empty square.
        board.set(5, 5, Player::White);
        let state = GameState::from_board(board, Player::Black);

        assert!(!state.is_legal_move(2, 3));
        assert!(!state.is_legal_move(5, 3));
        assert!(!state.is_legal_move(6, 6));
        assert!(!state.is_legal_move(4, 4));
        assert!(!state.has_any_legal_move());
    }

    #[test]
    fn black_at_2_3_flips_white_at_3_3() {
        let mut state = GameState::new();

        let outcome = state.play(2, 3).unwrap();

        assert_eq!(outcome, TurnOutcome::Continue);
        assert_eq!(state.board().cell(2, 3), Cell::Black);
        assert_eq!(state.board().cell(3, 3), Cell::Black);
        assert_eq!(state.board().cell(4, 4), Cell::White);
        assert_eq!(state.piece_counts(), PieceCounts { black: 4, white: 1 });
        assert_eq!(state.flipped(), &[idx(3, 3) as u8]);
        assert_eq!(state.turn(), Player::White);
    }

    #[test]
    fn apply_move_flips_every_capturing_line() {
        // Black at (0,0) captures along the row and the diagonal.
        let mut board = Board::empty();
        board.set(1, 0, Player::White);
        board.set(2, 0, Player::Black);
        board.set(1, 1, Player::White);
        board.set(2, 2, Player::White);
        board.set(3, 3, Player::Black);
        board.set(0, 1, Player::White);
        let mut state = GameState::from_board(board, Player::Black);

        state.apply_move(0, 0);

        assert_eq!(state.board().cell(1, 0), Cell::Black);
        assert_eq!(state.board().cell(1, 1), Cell::Black);
        assert_eq!(state.board().cell(2, 2), Cell::Black);
        // Column run falls off into empties, unchanged.
        assert_eq!(state.board().cell(0, 1), Cell::White);
        assert_eq!(state.piece_counts(), PieceCounts { black: 6, white: 1 });
        assert_eq!(state.turn(), Player::Black);
    }

    #[test]
    fn probe_and_apply_capture_split_check_from_mutation() {
        let mut state = GameState::new();
        let before = state.clone();

        assert!(state.probe_capture(2, 3, 1, 0));
        assert!(!state.probe_capture(2, 3, -1, 0));
        assert_eq!(state, before);

        assert_eq!(state.apply_capture(2, 3, -1, 0), 0);
        assert_eq!(state, before);
        assert_eq!(state.apply_capture(2, 3, 1, 0), 1);
        assert_eq!(state.board().cell(3, 3), Cell::Black);
        assert_eq!(state.piece_counts(), state.board().count());
        assert_eq!(state.piece_counts(), PieceCounts { black: 3, white: 1 });
    }

    #[test]
    fn each_move_adds_exactly_one_piece() {
        let mut state = GameState::new();

        for _ in 0..20 {
            if state.is_over() {
                break;
            }
            let before = state.piece_counts().total();
            let mv = state.legal_moves()[0];
            state.play(mv.x as usize, mv.y as usize).unwrap();

            let counts = state.piece_counts();
            assert_eq!(counts.total(), before + 1);
            assert_eq!(counts.total() + state.board().empty_count(), 64);
        }
    }

    #[test]
    fn legality_check_is_idempotent() {
        let state = GameState::new();
        let before = state.clone();

        let first: Vec<bool> = (0..NUM_SQUARES)
            .map(|pos| state.is_legal_move(pos % 8, pos / 8))
            .collect();
        let second: Vec<bool> = (0..NUM_SQUARES)
            .map(|pos| state.is_legal_move(pos % 8, pos / 8))
            .collect();

        assert_eq!(first, second);
        assert_eq!(state, before);
    }

    #[test]
    fn forced_pass_switches_turn_without_touching_board() {
        // Black on (1,0), (0,0) empty, everything else white.
        let black = bit(idx(1, 0));
        let white = FULL_BOARD ^ bit(idx(0, 0)) ^ black;
        let board = Board::from_bitboards(black, white);
        let mut state = GameState::from_board(board, Player::Black);

        let outcome = state.settle_turn();

        assert_eq!(outcome, TurnOutcome::Passed { player: Player::Black });
        assert_eq!(state.turn(), Player::White);
        assert!(state.skipped());
        assert!(!state.is_over());
        assert_eq!(*state.board(), board);
        assert!(state.has_any_legal_move());

        // White fills the last square; the full board ends the game.
        let outcome = state.play(0, 0).unwrap();

        assert_eq!(outcome, TurnOutcome::GameOver(Winner::White));
        assert!(state.is_over());
        assert!(!state.skipped());
        assert_eq!(state.piece_counts(), PieceCounts { black: 0, white: 64 });
        assert_eq!(state.flipped(), &[idx(1, 0) as u8]);
    }

    #[test]
    fn two_consecutive_passes_end_the_game_on_near_full_board() {
        let board = Board::from_bitboards(FULL_BOARD ^ bit(idx(0, 0)), 0);
        let mut state = GameState::from_board(board, Player::Black);

        let outcome = state.settle_turn();

        assert_eq!(outcome, TurnOutcome::GameOver(Winner::Black));
        assert!(state.is_over());
        assert!(state.skipped());
        assert_eq!(state.turn(), Player::White);
        assert_eq!(state.piece_counts(), PieceCounts { black: 63, white: 0 });
    }

    #[test]
    fn full_board_is_terminal_without_prior_pass() {
        let black = 0x0000_0000_FFFF_FFFF;
        let board = Board::from_bitboards(black, FULL_BOARD ^ black);
        let mut state = GameState::from_board(board, Player::White);

        assert!(!state.skipped());
        assert_eq!(state.settle_turn(), TurnOutcome::GameOver(Winner::Tie));
        assert!(state.is_over());
        assert_eq!(state.turn(), Player::White);
    }

    #[test]
    fn moves_are_rejected_after_game_over() {
        let board = Board::from_bitboards(FULL_BOARD ^ bit(idx(0, 0)), 0);
        let mut state = GameState::from_board(board, Player::Black);
        state.settle_turn();
        let before = state.clone();

        assert_eq!(state.play(0, 0), Err(MoveError::GameOver));
        assert_eq!(state.settle_turn(), TurnOutcome::GameOver(Winner::Black));
        assert_eq!(state, before);
    }

    #[test]
    fn play_rejects_bad_squares_without_mutation() {
        let mut state = GameState::new();
        let before = state.clone();

        assert_eq!(state.play(9, 0), Err(MoveError::OutOfRange { x: 9, y: 0 }));
        assert_eq!(state.play(0, 0), Err(MoveError::Illegal { x: 0, y: 0 }));
        assert_eq!(state.play(3, 3), Err(MoveError::Illegal { x: 3, y: 3 }));
        assert_eq!(state, before);
    }

    #[test]
    fn winner_is_determined_from_piece_counts() {
        let black = (1u64 << 40) - 1;
        let board = Board::from_bitboards(black, FULL_BOARD ^ black);
        let state = GameState::from_board(board, Player::Black);
        assert_eq!(state.determine_winner(), Winner::Black);
        assert_eq!(
            state.to_result(),
            GameResult {
                winner: Winner::Black,
                black_count: 40,
                white_count: 24
            }
        );

        let black = (1u64 << 32) - 1;
        let board = Board::from_bitboards(black, FULL_BOARD ^ black);
        let state = GameState::from_board(board, Player::Black);
        assert_eq!(state.determine_winner(), Winner::Tie);
    }

    #[test]
    fn snapshot_reflects_state() {
        let mut state = GameState::new();
        state.play(2, 3).unwrap();

        let snapshot = state.to_snapshot();

        assert_eq!(snapshot.board.len(), 64);
        assert_eq!(snapshot.board[idx(2, 3)], 1);
        assert_eq!(snapshot.board[idx(4, 4)], 2);
        assert_eq!(snapshot.turn, Player::White);
        assert_eq!(snapshot.black_count, 4);
        assert_eq!(snapshot.white_count, 1);
        assert!(!snapshot.skipped);
        assert!(!snapshot.is_game_over);
        assert_eq!(snapshot.flipped, vec![idx(3, 3) as u8]);
    }
}
