//! `go` search-time budget calculation.
//!
//! Implements the literal algorithm from spec §4.3: a single discontinuous
//! `wtime`/`btime` threshold (>= 10 minutes remaining thinks for a flat one
//! minute, otherwise a tenth of what's left), with `movetime`/`depth`/
//! `nodes`/`mate` overriding pieces of it. `original_source/src/uci_shell.cpp`
//! confirms the `600000`/`60000` constants verbatim (see SPEC_FULL.md §5.3),
//! so this module preserves them exactly rather than routing through the
//! engine's fancier incremental-time-control heuristics in `engine::time`.

use crate::board::{Board, Move, Side};

use super::command::GoParams;

/// Depth sentinel used when `go` doesn't specify `depth` or `mate`: high
/// enough that the engine's own node/time budget is always the limiting
/// factor first.
pub const MAX_PLYS: u32 = 128;

/// Node sentinel used when `go` doesn't specify `nodes`.
pub const MAX_NODES: u64 = u64::MAX;

/// Thinking-time sentinel for an effectively unbounded search (spec's
/// `INT_MAX/2` milliseconds).
pub const UNBOUNDED_TIME_MS: u64 = u64::MAX / 2;

/// The resolved stop conditions and root-move restriction for one `go`.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    pub max_depth: u32,
    pub max_nodes: u64,
    pub thinking_time_ms: u64,
    pub infinite: bool,
    pub ponder: bool,
    pub searchmoves: Vec<Move>,
}

impl Default for SearchBudget {
    fn default() -> Self {
        SearchBudget {
            max_depth: MAX_PLYS,
            max_nodes: MAX_NODES,
            thinking_time_ms: UNBOUNDED_TIME_MS,
            infinite: false,
            ponder: false,
            searchmoves: Vec::new(),
        }
    }
}

/// Compute the search budget for a `go` command against `board` (used only
/// to resolve side-to-move for the `wtime`/`btime` rule and to parse
/// `searchmoves` tokens -- unparseable moves are silently dropped, per
/// spec §7's "protocol parse failure is non-fatal" rule).
#[must_use]
pub fn compute_budget(board: &mut Board, params: &GoParams) -> SearchBudget {
    let mut budget = SearchBudget::default();

    for mv_str in &params.searchmoves {
        if let Ok(mv) = board.parse_move(mv_str) {
            budget.searchmoves.push(mv);
        }
    }

    if params.ponder {
        budget.infinite = true;
        budget.ponder = true;
    }
    if params.infinite {
        budget.infinite = true;
    }

    match board.side_to_move() {
        Side::White => {
            if let Some(n) = params.wtime {
                budget.thinking_time_ms = wtime_to_thinking_time(n);
            }
        }
        Side::Black => {
            if let Some(n) = params.btime {
                budget.thinking_time_ms = wtime_to_thinking_time(n);
            }
        }
        Side::None => {}
    }

    if let Some(d) = params.depth {
        budget.max_depth = d.min(MAX_PLYS);
    }
    if let Some(n) = params.nodes {
        budget.max_nodes = n.min(MAX_NODES);
    }
    if let Some(m) = params.mate {
        let plies = 2u32.saturating_mul(m).saturating_sub(1);
        budget.max_depth = plies.min(MAX_PLYS);
    }
    if let Some(mt) = params.movetime {
        budget.thinking_time_ms = mt;
    }

    budget
}

/// `N >= 600,000 ms` (10 minutes) -> think a flat 60,000 ms; otherwise
/// think a tenth of what's left. The discontinuity at exactly 600,000 is
/// the source's, not a rounding artifact -- see spec §9's open question.
fn wtime_to_thinking_time(remaining_ms: u64) -> u64 {
    if remaining_ms >= 600_000 {
        60_000
    } else {
        remaining_ms / 10
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uci::command::parse_go_params;

    #[test]
    fn wtime_threshold_is_discontinuous_at_600000() {
        assert_eq!(wtime_to_thinking_time(600_000), 60_000);
        assert_eq!(wtime_to_thinking_time(599_999), 59_999);
        assert_eq!(wtime_to_thinking_time(6_000_000), 60_000);
    }

    #[test]
    fn depth_is_capped_at_max_plys() {
        let mut board = Board::new();
        let parts: Vec<&str> = "go depth 999".split_whitespace().collect();
        let params = parse_go_params(&parts);
        let budget = compute_budget(&mut board, &params);
        assert_eq!(budget.max_depth, MAX_PLYS);
    }

    #[test]
    fn mate_n_sets_depth_to_2n_minus_1() {
        let mut board = Board::new();
        let parts: Vec<&str> = "go mate 3".split_whitespace().collect();
        let params = parse_go_params(&parts);
        let budget = compute_budget(&mut board, &params);
        assert_eq!(budget.max_depth, 5);
    }

    #[test]
    fn infinite_flag_is_recognized() {
        let mut board = Board::new();
        let parts: Vec<&str> = "go infinite".split_whitespace().collect();
        let params = parse_go_params(&parts);
        let budget = compute_budget(&mut board, &params);
        assert!(budget.infinite);
    }

    #[test]
    fn unparseable_searchmove_is_silently_dropped() {
        let mut board = Board::new();
        let parts: Vec<&str> = "go searchmoves e2e4 zz99 depth 2"
            .split_whitespace()
            .collect();
        let params = parse_go_params(&parts);
        let budget = compute_budget(&mut board, &params);
        assert_eq!(budget.searchmoves.len(), 1);
        assert_eq!(budget.max_depth, 2);
    }
}
