//! Position evaluation using tapered eval.
//!
//! Material and piece-square values are recomputed from occupancy on every
//! call (see `board::state::Board`'s doc comment on why no incremental
//! accumulator lives on the struct). Implements tapered evaluation with
//! advanced evaluation terms including:
//! - Material and piece-square tables
//! - Bishop pair bonus
//! - Bishop vs knight imbalance (bishops better in open positions)
//! - Mobility
//! - Pawn structure (passed, doubled, isolated, backward)
//! - King safety (attack units, pawn shield)
//! - Rook activity (open files, 7th rank)
//! - Hanging pieces
//! - Drawish endgame detection

use super::pst::{pst_eg, pst_mg, MATERIAL_EG, MATERIAL_MG, PHASE_WEIGHTS};
use super::{Board, Color, Piece, Side};

const PIECES: [Piece; 6] = [
    Piece::Pawn,
    Piece::Knight,
    Piece::Bishop,
    Piece::Rook,
    Piece::Queen,
    Piece::King,
];

/// Material + piece-square value and phase contribution for one side,
/// computed fresh from occupancy.
struct SideEval {
    mg: i32,
    eg: i32,
    phase: i32,
}

/// Phase-weight contribution of `color`'s non-pawn pieces, used outside the
/// evaluator by search pruning that needs to know whether a side still has
/// any minor/major pieces left.
pub(crate) fn side_phase(board: &Board, color: Color) -> i32 {
    eval_side(board, color).phase
}

fn eval_side(board: &Board, color: Color) -> SideEval {
    let mut mg = 0;
    let mut eg = 0;
    let mut phase = 0;
    for piece in PIECES {
        let piece_idx = piece.index();
        for sq in board.pieces_of(color, piece).iter() {
            let table_sq = match color {
                Color::White => sq,
                Color::Black => sq.flip_vertical(),
            };
            mg += MATERIAL_MG[piece_idx] + pst_mg(piece, table_sq.as_index());
            eg += MATERIAL_EG[piece_idx] + pst_eg(piece, table_sq.as_index());
            phase += PHASE_WEIGHTS[piece_idx];
        }
    }
    SideEval { mg, eg, phase }
}

/// Bishop pair bonus in centipawns (Texel tuned v2)
const BISHOP_PAIR_BONUS: i32 = 18;

/// Tempo bonus (side to move advantage) (Texel tuned v2)
const TEMPO_BONUS: i32 = 19;

/// Total phase value (sum of all pieces' phase weights at game start)
const PHASE_TOTAL: i32 = 24;

/// Score returned when neither side has sufficient mating material, short-circuiting
/// the rest of the evaluation regardless of material score input.
pub const SCORE_DRAW: i32 = 0;

/// Bishop vs Knight imbalance bonus per pawn difference from 8.
/// Bishops are worth more in open positions (fewer pawns).
/// Formula: `bishop_bonus` = (8 - `total_pawns`) * `BISHOP_OPEN_BONUS` per bishop advantage
/// (Texel tuned v2)
const BISHOP_OPEN_BONUS: i32 = 12;

/// Accumulated evaluation score with middlegame and endgame components.
#[derive(Debug, Clone, Copy, Default)]
struct EvalScore {
    mg: i32,
    eg: i32,
}

impl EvalScore {
    /// Create a new score from mg/eg tuple.
    #[inline]
    const fn new(mg: i32, eg: i32) -> Self {
        EvalScore { mg, eg }
    }

    /// Create a score where mg and eg are the same (e.g., for bonuses).
    #[inline]
    const fn both(value: i32) -> Self {
        EvalScore {
            mg: value,
            eg: value,
        }
    }

    /// Create a score with only middlegame component.
    #[inline]
    const fn mg_only(mg: i32) -> Self {
        EvalScore { mg, eg: 0 }
    }
}

impl std::ops::Add for EvalScore {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        EvalScore {
            mg: self.mg + other.mg,
            eg: self.eg + other.eg,
        }
    }
}

impl std::ops::AddAssign for EvalScore {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.mg += other.mg;
        self.eg += other.eg;
    }
}

impl From<(i32, i32)> for EvalScore {
    #[inline]
    fn from((mg, eg): (i32, i32)) -> Self {
        EvalScore { mg, eg }
    }
}

/// Phase factors for tapered evaluation.
///
/// Encapsulates the middlegame/endgame interpolation weights.
#[derive(Debug, Clone, Copy)]
struct PhaseFactors {
    /// Weight for middlegame evaluation (0-24)
    midphase: i32,
    /// Weight for endgame evaluation (0-24)
    endphase: i32,
    /// Multiplier for endgame when one side has only pawns (1 or 2)
    endgame_mult: i32,
}

impl PhaseFactors {
    /// Compute phase factors from game phase values.
    #[inline]
    fn from_game_phase(white_phase: i32, black_phase: i32) -> Self {
        let midphase = (white_phase + black_phase).min(PHASE_TOTAL);
        let endphase = PHASE_TOTAL - midphase;
        // Double endgame weight when one side has no non-pawn pieces
        let endgame_mult = if white_phase.min(black_phase) == 0 {
            2
        } else {
            1
        };
        PhaseFactors {
            midphase,
            endphase,
            endgame_mult,
        }
    }

    /// Apply tapered evaluation to middlegame and endgame scores.
    #[inline]
    fn taper(&self, mg_score: i32, eg_score: i32) -> i32 {
        (mg_score * self.midphase + self.endgame_mult * eg_score * self.endphase) / PHASE_TOTAL
    }
}

impl Board {
    /// Evaluate the position from the side-to-move's perspective.
    ///
    /// Uses tapered evaluation to interpolate between middlegame and endgame scores
    /// based on the current game phase. Includes all evaluation terms.
    #[must_use]
    pub fn evaluate(&self) -> i32 {
        if self.is_insufficient_material() {
            return SCORE_DRAW;
        }

        let white = eval_side(self, Color::White);
        let black = eval_side(self, Color::Black);
        let phase = PhaseFactors::from_game_phase(white.phase, black.phase);

        // Base scores (material + PST), recomputed from occupancy.
        let base_mg = white.mg - black.mg;
        let base_eg = white.eg - black.eg;

        // Bishop pair bonus
        let white_bishops = self.pieces_of(Color::White, Piece::Bishop).popcount();
        let black_bishops = self.pieces_of(Color::Black, Piece::Bishop).popcount();
        let bishop_pair_bonus =
            BISHOP_PAIR_BONUS * ((white_bishops / 2) as i32 - (black_bishops / 2) as i32);

        // Bishop vs Knight imbalance: bishops better in open positions
        let white_knights = self.pieces_of(Color::White, Piece::Knight).popcount();
        let black_knights = self.pieces_of(Color::Black, Piece::Knight).popcount();
        let total_pawns = self.pieces_of(Color::White, Piece::Pawn).popcount()
            + self.pieces_of(Color::Black, Piece::Pawn).popcount();
        let openness = (16 - total_pawns as i32).max(0); // 0 when 16 pawns, 16 when 0 pawns

        // Net bishop advantage (bishops - knights for each side)
        let white_bishop_adv = white_bishops as i32 - white_knights as i32;
        let black_bishop_adv = black_bishops as i32 - black_knights as i32;
        let bishop_imbalance =
            (white_bishop_adv - black_bishop_adv) * openness * BISHOP_OPEN_BONUS / 8;

        let bishop_bonus = bishop_pair_bonus + bishop_imbalance;

        // Compute attack context once for all evaluation terms
        let ctx = self.compute_attack_context();

        // Accumulate all evaluation terms using EvalScore
        let mut total = EvalScore::new(base_mg, base_eg);
        total += EvalScore::both(bishop_bonus);

        // Advanced evaluation terms (all from white's perspective)
        total += self.eval_mobility_with_context(&ctx).into();
        total += self.eval_pawn_structure().into();
        total += self.eval_king_safety_with_context(&ctx).into();
        total += self.eval_king_shield().into();
        total += self.eval_rooks().into();
        total += self.eval_minor_pieces(&ctx).into();
        total += EvalScore::mg_only(self.eval_tropism());

        // Combined evaluation for passed pawns and hanging pieces (shares attack computation)
        let (pass_mg, pass_eg, hanging) = self.eval_attacks_dependent_with_context(&ctx);
        total += EvalScore::new(pass_mg, pass_eg);
        total += EvalScore::both(hanging);

        // Additional advanced evaluation terms
        total += self.eval_coordination(&ctx).into();
        total += self.eval_pawn_advanced().into();
        total += self.eval_weak_squares(&ctx).into();
        total += self.eval_king_danger(&ctx).into();
        total += self.eval_endgame_patterns().into();
        total += self.eval_space_control(&ctx).into();
        total += self.eval_threats_advanced(&ctx).into();
        total += self.eval_piece_quality(&ctx).into();
        total += self.eval_imbalances().into();
        total += self.eval_initiative(&ctx).into();

        // Tapered evaluation
        let mut score = phase.taper(total.mg, total.eg) + TEMPO_BONUS;

        // Apply draw multiplier in endgames
        if phase.endphase > 12 {
            let strong = if score > 0 {
                Color::White
            } else {
                Color::Black
            };
            let mul = self.get_draw_multiplier(strong);
            score = score * mul / 64;
        }

        // Return from side-to-move perspective
        if self.white_to_move {
            score
        } else {
            -score
        }
    }

    /// Simple/fast evaluation for quiescence or pruning decisions.
    /// Only uses material + PST + bishop pair.
    /// Note: Bishop imbalance is only in full eval to keep simple eval fast.
    #[must_use]
    pub fn evaluate_simple(&self) -> i32 {
        let stm = self.side_to_move();
        let white = eval_side(self, Color::White);
        let black = eval_side(self, Color::Black);
        let (us, them) = match stm {
            Side::White => (&white, &black),
            Side::Black => (&black, &white),
            Side::None => (&white, &black),
        };

        let phase = PhaseFactors::from_game_phase(white.phase, black.phase);

        let mideval = us.mg - them.mg;
        let endeval = us.eg - them.eg;

        // Bishop pair bonus only (imbalance is in full eval)
        let stm_color = if self.white_to_move {
            Color::White
        } else {
            Color::Black
        };
        let our_bishops = self.pieces_of(stm_color, Piece::Bishop).popcount();
        let opp_bishops = self.opponent_pieces(stm_color, Piece::Bishop).popcount();
        let bishop_bonus =
            BISHOP_PAIR_BONUS * ((our_bishops / 2) as i32 - (opp_bishops / 2) as i32);

        phase.taper(mideval, endeval) + bishop_bonus + TEMPO_BONUS
    }

    /// Verify that the global occupancy invariant holds: every set bit in
    /// `all_occupied` must correspond to exactly one (color, piece-type)
    /// pair. Corruption here means a move was applied incorrectly upstream;
    /// this should never trip in practice, but the search treats a
    /// violation as fatal rather than silently evaluating garbage.
    fn validate_occupancy(&self) -> Result<(), crate::error::EngineError> {
        for sq in self.all_occupied.iter() {
            let mut claims = 0u32;
            for color in [Color::White, Color::Black] {
                for piece in PIECES {
                    if self.pieces_of(color, piece).contains(sq) {
                        claims += 1;
                    }
                }
            }
            if claims != 1 {
                return Err(crate::error::EngineError::InvalidPieceType { square: sq });
            }
        }
        Ok(())
    }

    /// [`evaluate`](Self::evaluate), but fails fast with
    /// [`EngineError::InvalidPieceType`](crate::error::EngineError::InvalidPieceType)
    /// if the position's occupancy bitboards are inconsistent. Reserved for
    /// call sites outside the search hot path (e.g. the `eval` debug
    /// command) where the cost of validating occupancy once is negligible;
    /// per-node search evaluation stays on plain `evaluate`.
    pub fn evaluate_checked(&self) -> Result<i32, crate::error::EngineError> {
        self.validate_occupancy()?;
        Ok(self.evaluate())
    }

    /// Per-feature tapered breakdown of [`evaluate`](Self::evaluate), for
    /// the `eval` debug command. Not on the search hot path: recomputes
    /// every term independently rather than sharing `evaluate`'s single
    /// accumulator pass.
    #[must_use]
    pub fn evaluate_breakdown(&self) -> EvalBreakdown {
        let white = eval_side(self, Color::White);
        let black = eval_side(self, Color::Black);
        let phase = PhaseFactors::from_game_phase(white.phase, black.phase);

        let material_mg = white.mg - black.mg;
        let material_eg = white.eg - black.eg;
        let ctx = self.compute_attack_context();

        let mut terms: Vec<(&'static str, EvalScore)> = vec![
            ("mobility", self.eval_mobility_with_context(&ctx).into()),
            ("pawn_structure", self.eval_pawn_structure().into()),
            ("king_safety", self.eval_king_safety_with_context(&ctx).into()),
            ("king_shield", self.eval_king_shield().into()),
            ("rooks", self.eval_rooks().into()),
            ("minor_pieces", self.eval_minor_pieces(&ctx).into()),
            ("tropism", EvalScore::mg_only(self.eval_tropism())),
            ("coordination", self.eval_coordination(&ctx).into()),
            ("pawn_advanced", self.eval_pawn_advanced().into()),
            ("weak_squares", self.eval_weak_squares(&ctx).into()),
            ("king_danger", self.eval_king_danger(&ctx).into()),
            ("endgame_patterns", self.eval_endgame_patterns().into()),
            ("space_control", self.eval_space_control(&ctx).into()),
            ("threats_advanced", self.eval_threats_advanced(&ctx).into()),
            ("piece_quality", self.eval_piece_quality(&ctx).into()),
            ("imbalances", self.eval_imbalances().into()),
            ("initiative", self.eval_initiative(&ctx).into()),
        ];
        let (pass_mg, pass_eg, hanging) = self.eval_attacks_dependent_with_context(&ctx);
        terms.push(("passed_pawns", EvalScore::new(pass_mg, pass_eg)));
        terms.push(("hanging", EvalScore::both(hanging)));

        let named: Vec<(&'static str, i32)> = terms
            .iter()
            .map(|(name, score)| (*name, phase.taper(score.mg, score.eg)))
            .collect();

        EvalBreakdown {
            total: self.evaluate(),
            material: phase.taper(material_mg, material_eg),
            terms: named,
        }
    }
}

/// Per-feature tapered evaluation breakdown, for the `eval` debug command.
#[derive(Debug, Clone)]
pub struct EvalBreakdown {
    pub total: i32,
    pub material: i32,
    pub terms: Vec<(&'static str, i32)>,
}

impl EvalBreakdown {
    /// Render as plain text: one `<name> <value>` line per feature.
    #[must_use]
    pub fn format(&self) -> String {
        let mut out = format!("total {}\nmaterial {}\n", self.total, self.material);
        for (name, value) in &self.terms {
            out.push_str(&format!("{name} {value}\n"));
        }
        out
    }
}
