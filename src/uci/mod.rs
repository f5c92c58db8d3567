//! Universal Chess Interface (UCI) protocol implementation.
//!
//! Handles communication with chess GUIs following the UCI specification.

use std::fmt;
use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::board::{Board, FenError, Move, MoveParseError, SearchIterationInfo, DEFAULT_TT_MB};
use crate::engine::{EngineController, SearchParams as EngineSearchParams};

pub mod command;
pub mod go_params;
pub mod options;
pub mod print;
pub mod report;
pub mod time;

use command::{parse_go_params, parse_uci_command, UciCommand};
use go_params::SearchBudget;
use options::{parse_setoption, UciOptionAction, UciOptions};

/// Error type for UCI position command parsing
#[derive(Debug, Clone)]
pub enum UciError {
    /// Invalid FEN string
    InvalidFen(FenError),
    /// Invalid move in the move list
    InvalidMove { move_str: String, error: MoveParseError },
    /// Missing required parts in the command
    MissingParts,
}

impl fmt::Display for UciError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UciError::InvalidFen(e) => write!(f, "Invalid FEN: {e}"),
            UciError::InvalidMove { move_str, error } => {
                write!(f, "Invalid move '{move_str}': {error}")
            }
            UciError::MissingParts => write!(f, "Missing required parts in position command"),
        }
    }
}

impl std::error::Error for UciError {}

impl From<FenError> for UciError {
    fn from(e: FenError) -> Self {
        UciError::InvalidFen(e)
    }
}

/// Parse a move in UCI format (e.g., "e2e4", "e7e8q").
///
/// Delegates to `Board::parse_move`. Returns `None` if the move is invalid.
#[must_use]
pub fn parse_uci_move(board: &mut Board, uci_string: &str) -> Option<Move> {
    board.parse_move(uci_string).ok()
}

/// Parse a UCI position command, returning an error on failure.
///
/// Supports both "position startpos" and "position fen <fen>" formats,
/// optionally followed by "moves <move1> <move2> ...".
pub fn try_parse_position_command(board: &mut Board, parts: &[&str]) -> Result<(), UciError> {
    let mut i = 1;

    if i >= parts.len() {
        return Err(UciError::MissingParts);
    }

    if parts[i] == "startpos" {
        *board = Board::new();
        i += 1;
    } else if parts[i] == "fen" {
        if i + 6 >= parts.len() {
            return Err(UciError::MissingParts);
        }
        let fen = parts[i + 1..i + 7].join(" ");
        *board = Board::try_from_fen(&fen)?;
        i += 7;
    } else {
        return Err(UciError::MissingParts);
    }

    if i < parts.len() && parts[i] == "moves" {
        i += 1;
        while i < parts.len() {
            let mv = board.parse_move(parts[i]).map_err(|e| UciError::InvalidMove {
                move_str: parts[i].to_string(),
                error: e,
            })?;
            board.make_move(mv);
            i += 1;
        }
    }

    Ok(())
}

/// Parse a UCI position command, printing errors to stderr on failure.
///
/// This is a convenience wrapper around `try_parse_position_command` for
/// use in the main UCI loop where errors should be logged but not propagated.
pub fn parse_position_command(board: &mut Board, parts: &[&str]) {
    if let Err(e) = try_parse_position_command(board, parts) {
        eprintln!("Error: {e}");
    }
}

#[must_use]
pub fn format_uci_move(mv: &Move) -> String {
    mv.to_string()
}

/// How often the periodic `info` line is emitted while a search runs.
const PERIODIC_INFO_INTERVAL_MS: u64 = 1000;
/// Poll granularity for the periodic-info thread noticing a finished search.
const PERIODIC_INFO_POLL_MS: u64 = 100;

/// The UCI protocol shell: reads commands from standard input, dispatches
/// them to an [`EngineController`], and formats engine-originated output.
///
/// Owns the process's single command loop; the search itself runs on a
/// background thread spawned by the controller per spec §4.3/§5.
pub struct Shell {
    engine: EngineController,
    options: UciOptions,
    /// Flips to `false` when the active search's `on_complete` fires, so
    /// the periodic-info thread knows to stop polling.
    searching: Arc<AtomicBool>,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    #[must_use]
    pub fn new() -> Self {
        let options = UciOptions::new(DEFAULT_TT_MB);
        let engine = EngineController::new(options.hash_mb);
        Shell {
            engine,
            options,
            searching: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Run the blocking command loop until `quit` or end of input.
    pub fn run(&mut self) {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if self.dispatch(&line) {
                break;
            }
        }
        self.engine.stop_search();
    }

    /// Process one input line. Returns `true` if the shell should exit.
    fn dispatch(&mut self, line: &str) -> bool {
        let Some(cmd) = parse_uci_command(line) else {
            return false;
        };

        match cmd {
            UciCommand::Uci => {
                self.engine.with_search_state(|state| {
                    self.options.print_and_reset(state.params_mut());
                });
            }
            UciCommand::IsReady => report::print_ready(),
            UciCommand::UciNewGame => {
                self.engine.new_game();
                self.engine.resize_hash(self.options.hash_mb);
            }
            UciCommand::Position(parts) => {
                self.engine.stop_search();
                let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
                parse_position_command(self.engine.board_mut(), &refs);
            }
            UciCommand::Go(parts) => {
                let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
                self.start_search(&refs);
            }
            UciCommand::Perft(depth) => self.run_perft(depth),
            UciCommand::SetOption(parts) => {
                let refs: Vec<&str> = parts.iter().map(String::as_str).collect();
                self.apply_setoption(&refs);
            }
            UciCommand::Debug(arg) => {
                let on = arg.as_deref() != Some("off");
                self.engine.set_trace(on);
            }
            UciCommand::Display => println!("{}", crate::board::debug::render(self.engine.board())),
            UciCommand::Eval => println!("{}", self.engine.board().evaluate_breakdown().format()),
            UciCommand::Stop => self.engine.signal_stop(),
            UciCommand::PonderHit => self.engine.ponderhit(),
            UciCommand::Quit => return true,
            UciCommand::Unknown(_) => {}
        }

        false
    }

    fn apply_setoption(&mut self, parts: &[&str]) {
        let Some((name, value)) = parse_setoption(parts) else {
            return;
        };
        let action = self
            .engine
            .with_search_state(|state| self.options.apply_setoption(&name, value.as_deref(), state))
            .flatten();
        match action {
            Some(UciOptionAction::ReinitHash(mb)) => self.engine.resize_hash(mb),
            Some(UciOptionAction::SetThreads(_)) => {
                // Single search-thread model (spec §5): no SMP worker pool to resize.
            }
            None => {}
        }
    }

    fn run_perft(&mut self, depth: usize) {
        let start = Instant::now();
        let nodes = self.engine.board_mut().perft(depth);
        print::print_perft_info(depth, nodes, start.elapsed());
    }

    fn start_search(&mut self, go_parts: &[&str]) {
        let go = parse_go_params(go_parts);
        let budget: SearchBudget = go_params::compute_budget(self.engine.board_mut(), &go);

        if self.options.analyse_mode {
            self.engine.resize_hash(self.options.hash_mb);
        }

        let effective_max_nodes = if self.options.default_max_nodes > 0 {
            budget.max_nodes.min(self.options.default_max_nodes)
        } else {
            budget.max_nodes
        };
        self.engine.set_max_nodes(if effective_max_nodes >= go_params::MAX_NODES {
            0
        } else {
            effective_max_nodes
        });

        let thinking_time_ms = if budget.thinking_time_ms >= go_params::UNBOUNDED_TIME_MS {
            0
        } else {
            budget
                .thinking_time_ms
                .saturating_sub(self.options.move_overhead_ms)
        };

        let params = EngineSearchParams {
            depth: Some(budget.max_depth),
            soft_time_ms: thinking_time_ms,
            hard_time_ms: thinking_time_ms,
            ponder: budget.ponder,
            infinite: budget.infinite,
            multi_pv: self.options.multi_pv,
            searchmoves: budget.searchmoves,
        };

        self.engine.set_info_callback(Some(Arc::new(report::print_pv_info)));

        self.searching.store(true, Ordering::Relaxed);
        self.spawn_periodic_info_thread();

        let searching = Arc::clone(&self.searching);
        self.engine.start_search(params, move |result| {
            searching.store(false, Ordering::Relaxed);
            report::print_bestmove(result.best_move, result.ponder_move);
        });
    }

    /// Periodically emit `info time <ms> nodes <n> hashfull <permille> nps <n>`
    /// lines while a search is running (spec §4.3's "Periodic" info format).
    fn spawn_periodic_info_thread(&self) {
        let searching = Arc::clone(&self.searching);
        let state = Arc::clone(self.engine.search_state());
        let start = Instant::now();

        thread::spawn(move || {
            let mut elapsed_since_report = Duration::ZERO;
            while searching.load(Ordering::Relaxed) {
                thread::sleep(Duration::from_millis(PERIODIC_INFO_POLL_MS));
                elapsed_since_report += Duration::from_millis(PERIODIC_INFO_POLL_MS);
                if !searching.load(Ordering::Relaxed) {
                    break;
                }
                if elapsed_since_report.as_millis() as u64 >= PERIODIC_INFO_INTERVAL_MS {
                    elapsed_since_report = Duration::ZERO;
                    let (nodes, hashfull) = {
                        let guard = state.lock();
                        (guard.stats.total_nodes, guard.hashfull_per_mille())
                    };
                    report::print_periodic_info(start.elapsed().as_millis() as u64, nodes, hashfull);
                }
            }
        });
    }
}
