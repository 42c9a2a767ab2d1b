use once_cell::sync::Lazy;

use crate::types::{Cell, PieceCounts, Player};

pub const BOARD_SIZE: usize = 8;
pub const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;

/// Unit steps as `(dx, dy)`: column delta, row delta.
pub const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// For every square, the mask of its (board-clamped) 8-neighbors.
static NEIGHBOR_MASKS: Lazy<[u64; NUM_SQUARES]> = Lazy::new(|| {
    let mut masks = [0u64; NUM_SQUARES];
    for (pos, mask) in masks.iter_mut().enumerate() {
        let (x, y) = pos_to_xy(pos);
        for (dx, dy) in DIRECTIONS {
            if let Some(neighbor) = xy_to_pos(x + dx, y + dy) {
                *mask |= bit(neighbor);
            }
        }
    }
    masks
});

/// Othello board state represented by two bitboards.
/// Square index is `y * 8 + x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the starting board:
    /// (3,3)=white, (4,3)=black, (3,4)=black, (4,4)=white.
    pub fn new() -> Self {
        Self {
            black: bit(idx(4, 3)) | bit(idx(3, 4)),
            white: bit(idx(3, 3)) | bit(idx(4, 4)),
        }
    }

    pub fn empty() -> Self {
        Self { black: 0, white: 0 }
    }

    /// Builds a board from raw masks. A square set in both masks is kept black.
    pub fn from_bitboards(black: u64, white: u64) -> Self {
        Self {
            black,
            white: white & !black,
        }
    }

    pub fn cell(&self, x: usize, y: usize) -> Cell {
        if !on_board(x, y) {
            return Cell::Empty;
        }
        let square = bit(idx(x, y));
        if (self.black & square) != 0 {
            Cell::Black
        } else if (self.white & square) != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    pub fn is_occupied(&self, x: usize, y: usize) -> bool {
        self.cell(x, y) != Cell::Empty
    }

    /// Puts `player`'s piece on (x, y), replacing whatever was there.
    pub fn set(&mut self, x: usize, y: usize, player: Player) {
        if !on_board(x, y) {
            return;
        }
        let square = bit(idx(x, y));
        match player {
            Player::Black => {
                self.black |= square;
                self.white &= !square;
            }
            Player::White => {
                self.white |= square;
                self.black &= !square;
            }
        }
    }

    /// True if any square within Chebyshev distance 1 is occupied.
    pub fn has_occupied_neighbor(&self, x: usize, y: usize) -> bool {
        if !on_board(x, y) {
            return false;
        }
        (NEIGHBOR_MASKS[idx(x, y)] & self.occupied()) != 0
    }

    /// Walks from (x, y) in direction (dx, dy) and returns the mask of the
    /// opponent run that `mover` would capture there, or 0 when the line is
    /// not a capturing line. Never mutates.
    pub(crate) fn capture_run(&self, x: usize, y: usize, dx: i32, dy: i32, mover: Player) -> u64 {
        if dx == 0 && dy == 0 {
            return 0;
        }
        let (me, opp) = self.sides(mover);
        let mut cx = x as i32 + dx;
        let mut cy = y as i32 + dy;
        let mut run = 0u64;

        while let Some(pos) = xy_to_pos(cx, cy) {
            let square = bit(pos);
            if (opp & square) != 0 {
                run |= square;
            } else if (me & square) != 0 {
                // An own piece right next to the origin leaves `run` empty.
                return run;
            } else {
                return 0;
            }
            cx += dx;
            cy += dy;
        }

        0
    }

    /// Turns every square in `mask` to `mover`'s colour.
    pub(crate) fn flip(&mut self, mask: u64, mover: Player) {
        match mover {
            Player::Black => {
                self.black |= mask;
                self.white &= !mask;
            }
            Player::White => {
                self.white |= mask;
                self.black &= !mask;
            }
        }
    }

    /// Full recount of both colours.
    pub fn count(&self) -> PieceCounts {
        PieceCounts {
            black: self.black.count_ones() as u8,
            white: self.white.count_ones() as u8,
        }
    }

    pub fn empty_count(&self) -> u8 {
        NUM_SQUARES as u8 - self.count().total()
    }

    pub fn is_full(&self) -> bool {
        self.occupied() == u64::MAX
    }

    /// Converts board to `[u8; 64]` where 0=empty, 1=black, 2=white.
    pub fn to_array(&self) -> [u8; NUM_SQUARES] {
        let mut board = [0u8; NUM_SQUARES];
        for (pos, cell) in board.iter_mut().enumerate() {
            let (x, y) = pos_to_xy(pos);
            *cell = self.cell(x as usize, y as usize).code();
        }
        board
    }

    fn occupied(&self) -> u64 {
        self.black | self.white
    }

    fn sides(&self, mover: Player) -> (u64, u64) {
        match mover {
            Player::Black => (self.black, self.white),
            Player::White => (self.white, self.black),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

pub(crate) fn idx(x: usize, y: usize) -> usize {
    y * BOARD_SIZE + x
}

/// Lists set bits of `mask` in ascending square order.
pub(crate) fn mask_to_indices(mask: u64) -> Vec<u8> {
    let mut bits = mask;
    let mut out = Vec::new();

    while bits != 0 {
        out.push(bits.trailing_zeros() as u8);
        bits &= bits - 1;
    }

    out
}

fn on_board(x: usize, y: usize) -> bool {
    x < BOARD_SIZE && y < BOARD_SIZE
}

fn pos_to_xy(pos: usize) -> (i32, i32) {
    ((pos % BOARD_SIZE) as i32, (pos / BOARD_SIZE) as i32)
}

fn xy_to_pos(x: i32, y: i32) -> Option<usize> {
    in_bounds(x, y).then(|| (y as usize) * BOARD_SIZE + x as usize)
}

fn in_bounds(x: i32, y: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&x) && (0..BOARD_SIZE as i32).contains(&y)
}
