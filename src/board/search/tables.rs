//! Move-ordering heuristic tables: history, killers, counter moves,
//! continuation history and capture history. These assist the search
//! collaborator in ordering moves for alpha-beta cutoffs; none of them are
//! part of the protocol- or cache-facing contract the shell or
//! transposition table depend on.

use std::ops::{Deref, DerefMut};

use super::super::{Move, Piece};
use super::super::EMPTY_MOVE;
use super::MAX_PLY;

const HISTORY_SIZE: usize = 4096;

fn move_index(mv: &Move) -> usize {
    mv.from().index() * 64 + mv.to().index()
}

/// Quiet-move history, indexed by (from, to). Positive for moves that
/// caused cutoffs, negative for quiets tried but not chosen.
#[derive(Clone)]
pub struct HistoryTable([i32; HISTORY_SIZE]);

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        HistoryTable([0; HISTORY_SIZE])
    }

    #[must_use]
    pub fn score(&self, mv: &Move) -> i32 {
        self.0[move_index(mv)]
    }

    /// Reward a move that caused a beta cutoff at the given depth. `ply` is
    /// accepted for callers that track it alongside depth but does not
    /// affect the score (history is keyed by move only).
    pub fn update(&mut self, mv: &Move, depth: u32, _ply: usize) {
        let i = move_index(mv);
        self.0[i] = self.0[i].saturating_add((depth * depth) as i32);
    }

    /// Penalize a quiet move that was tried but did not cause the cutoff,
    /// so it sorts lower next time a move that did beats it to the punch.
    pub fn penalize(&mut self, mv: &Move, depth: u32) {
        let i = move_index(mv);
        self.0[i] = self.0[i].saturating_sub((depth * depth) as i32);
    }

    pub fn decay(&mut self) {
        for v in self.0.iter_mut() {
            *v >>= 1;
        }
    }

    pub fn reset(&mut self) {
        self.0 = [0; HISTORY_SIZE];
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for HistoryTable {
    type Target = [i32; HISTORY_SIZE];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for HistoryTable {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Up to three killer (quiet, non-capturing) moves per ply, most-recent first.
#[derive(Clone)]
pub struct KillerMoves([[Move; 3]; MAX_PLY]);

impl KillerMoves {
    #[must_use]
    pub fn new() -> Self {
        KillerMoves([[EMPTY_MOVE; 3]; MAX_PLY])
    }

    #[must_use]
    pub fn primary(&self, ply: usize) -> Move {
        self.0.get(ply).map_or(EMPTY_MOVE, |slots| slots[0])
    }

    #[must_use]
    pub fn secondary(&self, ply: usize) -> Move {
        self.0.get(ply).map_or(EMPTY_MOVE, |slots| slots[1])
    }

    #[must_use]
    pub fn tertiary(&self, ply: usize) -> Move {
        self.0.get(ply).map_or(EMPTY_MOVE, |slots| slots[2])
    }

    pub fn update(&mut self, ply: usize, mv: Move) {
        if let Some(slots) = self.0.get_mut(ply) {
            if slots[0] != mv {
                slots[2] = slots[1];
                slots[1] = slots[0];
                slots[0] = mv;
            }
        }
    }

    pub fn reset(&mut self) {
        for slot in &mut self.0 {
            *slot = [EMPTY_MOVE; 3];
        }
    }
}

impl Default for KillerMoves {
    fn default() -> Self {
        Self::new()
    }
}

/// The move that refuted a given (from, to) opponent move last time it was seen.
#[derive(Clone)]
pub struct CounterMoves([[Move; 64]; 64]);

impl CounterMoves {
    #[must_use]
    pub fn new() -> Self {
        CounterMoves([[EMPTY_MOVE; 64]; 64])
    }

    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> Move {
        self.0
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(EMPTY_MOVE)
    }

    pub fn set(&mut self, from: usize, to: usize, mv: Move) {
        if let Some(slot) = self.0.get_mut(from).and_then(|row| row.get_mut(to)) {
            *slot = mv;
        }
    }

    pub fn reset(&mut self) {
        for row in &mut self.0 {
            *row = [EMPTY_MOVE; 64];
        }
    }
}

impl Default for CounterMoves {
    fn default() -> Self {
        Self::new()
    }
}

/// History keyed by (previous piece moved, previous to-square, this move's
/// to-square) -- rewards quiets that follow up well on the opponent's reply.
#[derive(Clone)]
pub struct ContinuationHistory(Vec<i32>);

impl ContinuationHistory {
    const PIECES: usize = 6;
    const SQUARES: usize = 64;

    fn idx(piece: Piece, prev_to: usize, mv: &Move) -> usize {
        let to = mv.to().index();
        (piece.index() * Self::SQUARES + prev_to) * Self::SQUARES + to
    }

    #[must_use]
    pub fn new() -> Self {
        ContinuationHistory(vec![0i32; Self::PIECES * Self::SQUARES * Self::SQUARES])
    }

    #[must_use]
    pub fn score(&self, piece: Piece, prev_to: usize, mv: &Move) -> i32 {
        self.0[Self::idx(piece, prev_to, mv)]
    }

    pub fn update(&mut self, piece: Piece, prev_to: usize, mv: &Move, depth: u32) {
        let i = Self::idx(piece, prev_to, mv);
        self.0[i] = self.0[i].saturating_add((depth * depth) as i32);
    }

    pub fn decay(&mut self) {
        for v in self.0.iter_mut() {
            *v >>= 1;
        }
    }

    pub fn reset(&mut self) {
        for v in self.0.iter_mut() {
            *v = 0;
        }
    }
}

impl Default for ContinuationHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// History keyed by (attacker piece type, victim piece type) for captures
/// that caused a cutoff, used to break ties among same-MVV-LVA captures.
#[derive(Clone)]
pub struct CaptureHistory([[i32; 6]; 6]);

impl CaptureHistory {
    #[must_use]
    pub fn new() -> Self {
        CaptureHistory([[0; 6]; 6])
    }

    #[must_use]
    pub fn score(&self, attacker: Piece, victim: Piece) -> i32 {
        self.0[attacker.index()][victim.index()]
    }

    pub fn update(&mut self, attacker: Piece, victim: Piece, depth: u32) {
        let (a, v) = (attacker.index(), victim.index());
        self.0[a][v] = self.0[a][v].saturating_add((depth * depth) as i32);
    }
}

impl Default for CaptureHistory {
    fn default() -> Self {
        Self::new()
    }
}
