//! Debug/formatting helpers: ASCII board rendering and raw bitboard dumps.
//!
//! Exposed regardless of build profile since the UCI shell's `d` debug
//! command (a supplement beyond the core UCI command table, matching the
//! convention most engines borrow from Stockfish) uses [`render`] in
//! release builds too.

use super::{Bitboard, Board, Color, Piece};

/// Render the position as an ASCII 8x8 grid, from White's point of view,
/// with a trailing FEN line -- the `d` debug command's output.
#[must_use]
pub fn render(board: &Board) -> String {
    let mut out = String::new();
    out.push_str("  +---+---+---+---+---+---+---+---+\n");
    for rank in (0..8).rev() {
        out.push_str(&format!("{} |", rank + 1));
        for file in 0..8 {
            let sq = super::Square::from_index((rank * 8 + file) as usize);
            let ch = match board.piece_at(sq) {
                Some((Color::White, piece)) => piece_letter(piece).to_ascii_uppercase(),
                Some((Color::Black, piece)) => piece_letter(piece),
                None => ' ',
            };
            out.push_str(&format!(" {ch} |"));
        }
        out.push('\n');
        out.push_str("  +---+---+---+---+---+---+---+---+\n");
    }
    out.push_str("    a   b   c   d   e   f   g   h\n\n");
    out.push_str(&format!("Fen: {}\n", board.to_fen()));
    out.push_str(&format!("Key: {:016x}\n", board.hash));
    out
}

fn piece_letter(piece: Piece) -> char {
    match piece {
        Piece::Pawn => 'p',
        Piece::Knight => 'n',
        Piece::Bishop => 'b',
        Piece::Rook => 'r',
        Piece::Queen => 'q',
        Piece::King => 'k',
    }
}

impl Board {
    /// Debug helper to print all bitboard values
    pub fn debug_bitboards(&self) {
        let colors = [Color::White, Color::Black];
        let pieces = [
            (Piece::Pawn, "P"),
            (Piece::Knight, "N"),
            (Piece::Bishop, "B"),
            (Piece::Rook, "R"),
            (Piece::Queen, "Q"),
            (Piece::King, "K"),
        ];

        println!(
            "Side to move: {}",
            if self.white_to_move { "White" } else { "Black" }
        );
        println!("Castling mask: {:#06b}", self.castling_rights);
        if let Some(ep_target) = self.en_passant_target {
            println!("EP Target: {ep_target}");
        }
        println!("All occupied: {:#018x}", self.all_occupied.0);

        for color in colors {
            let label = if color == Color::White {
                "White"
            } else {
                "Black"
            };
            for (piece, name) in pieces {
                let bb = self.pieces_of(color, piece).0;
                println!("{label} {name}: {bb:#018x}");
            }
        }
        println!("------------------------------------");
    }

    pub fn print_bitboard_grid(&self, label: &str, bb: Bitboard) {
        println!("{} {:#018x}", label, bb.0);
        println!("  +---+---+---+---+---+---+---+---+");
        for rank in (0..8).rev() {
            print!("{} |", rank + 1);
            for file in 0..8 {
                let idx = (rank * 8 + file) as u8;
                let ch = if (bb.0 >> idx) & 1 == 1 { '1' } else { '.' };
                print!(" {ch} |");
            }
            println!("\n  +---+---+---+---+---+---+---+---+");
        }
        println!("    a   b   c   d   e   f   g   h");
        println!("------------------------------------");
    }
}
