//! Sliding puzzle model.
//!
//! Mirrors the shuffle the puzzle document runs in the browser: start from the
//! solved board and replay random legal slides. Every board produced this way is
//! reachable from the solved state, hence solvable.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{Difficulty, GridSize};

/// Board cells in row-major order; `0` is the empty cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    side: usize,
    tiles: Vec<u8>,
    empty: usize,
}

impl Board {
    pub fn solved(size: GridSize) -> Self {
        let side = size.side();
        let cells = side * side;
        let mut tiles: Vec<u8> = (1..cells as u8).collect();
        tiles.push(0);
        Self {
            side,
            tiles,
            empty: cells - 1,
        }
    }

    /// A solved board scrambled by `difficulty.shuffle_moves()` random slides.
    pub fn shuffled<R: Rng + ?Sized>(size: GridSize, difficulty: Difficulty, rng: &mut R) -> Self {
        let mut board = Self::solved(size);
        for _ in 0..difficulty.shuffle_moves() {
            let options = board.movable();
            if let Some(&index) = options.choose(rng) {
                board.slide(index);
            }
        }
        board
    }

    pub fn side(&self) -> usize {
        self.side
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    pub fn empty_index(&self) -> usize {
        self.empty
    }

    /// Cells that may slide into the empty cell: up, down, left, right.
    pub fn movable(&self) -> Vec<usize> {
        let row = self.empty / self.side;
        let col = self.empty % self.side;
        let mut moves = Vec::with_capacity(4);
        if row > 0 {
            moves.push(self.empty - self.side);
        }
        if row < self.side - 1 {
            moves.push(self.empty + self.side);
        }
        if col > 0 {
            moves.push(self.empty - 1);
        }
        if col < self.side - 1 {
            moves.push(self.empty + 1);
        }
        moves
    }

    /// Slides the tile at `index` into the empty cell. Returns false for an illegal move.
    pub fn slide(&mut self, index: usize) -> bool {
        if !self.movable().contains(&index) {
            return false;
        }
        self.tiles.swap(index, self.empty);
        self.empty = index;
        true
    }

    /// Every numbered tile sits at its ascending position.
    pub fn is_solved(&self) -> bool {
        self.tiles[..self.tiles.len() - 1]
            .iter()
            .enumerate()
            .all(|(i, &t)| t as usize == i + 1)
    }

    /// Reachability test from the solved state.
    ///
    /// Each slide is a transposition with the empty cell and moves it by one
    /// step, so permutation parity must equal the parity of the empty cell's
    /// distance from the bottom-right corner.
    pub fn is_solvable(&self) -> bool {
        let cells = self.tiles.len();
        let normalized: Vec<usize> = self
            .tiles
            .iter()
            .map(|&t| if t == 0 { cells } else { t as usize })
            .collect();

        let mut inversions = 0usize;
        for i in 0..cells {
            for j in (i + 1)..cells {
                if normalized[i] > normalized[j] {
                    inversions += 1;
                }
            }
        }

        let row = self.empty / self.side;
        let col = self.empty % self.side;
        let distance = (self.side - 1 - row) + (self.side - 1 - col);
        inversions % 2 == distance % 2
    }
}
