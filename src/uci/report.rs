//! `info`/`bestmove` line formatting (spec §4.3's literal formats).

use crate::board::{Move, SearchIterationInfo};

use super::format_uci_move;

pub fn print_ready() {
    println!("readyok");
}

/// `bestmove <move> [ponder <move>]`. A missing best move (stalemate,
/// checkmate, or a corrupted position the search refused to continue
/// from) is reported as the conventional null move `0000` rather than
/// omitting the line -- front-ends expect exactly one `bestmove` per `go`.
pub fn print_bestmove(best_move: Option<Move>, ponder_move: Option<Move>) {
    match best_move {
        Some(mv) => {
            let uci_move = format_uci_move(&mv);
            match ponder_move {
                Some(ponder) => {
                    println!("bestmove {uci_move} ponder {}", format_uci_move(&ponder));
                }
                None => println!("bestmove {uci_move}"),
            }
        }
        None => {
            #[cfg(feature = "logging")]
            log::error!("search produced no best move; reporting null move 0000");
            println!("bestmove 0000");
        }
    }
}

/// PV line: `info depth <d> seldepth <sd> score <cp N | mate ±K> time <ms> nodes <n> pv <m1> <m2> …`.
pub fn print_pv_info(info: &SearchIterationInfo) {
    let score = match info.mate_in {
        Some(mate) => format!("mate {mate}"),
        None => format!("cp {}", info.score),
    };
    println!(
        "info depth {} seldepth {} score {} time {} nodes {} pv {}",
        info.depth,
        info.seldepth,
        score,
        info.time_ms.max(1),
        info.nodes,
        info.pv
    );
}

/// Depth-only line: `info depth <d>`.
pub fn print_depth_info(depth: u32) {
    println!("info depth {depth}");
}

/// Current-move line: `info currmove <uci> currmovenumber <k>`.
pub fn print_currmove_info(mv: &Move, currmovenumber: u32) {
    println!(
        "info currmove {} currmovenumber {}",
        format_uci_move(mv),
        currmovenumber
    );
}

/// Periodic line: `info time <ms> nodes <n> hashfull <permille> nps <n*1000/ms>`,
/// with `ms` clamped to at least 1 to avoid a division by zero.
pub fn print_periodic_info(time_ms: u64, nodes: u64, hashfull_permille: u32) {
    let time_ms = time_ms.max(1);
    let nps = nodes * 1000 / time_ms;
    println!("info time {time_ms} nodes {nodes} hashfull {hashfull_permille} nps {nps}");
}
