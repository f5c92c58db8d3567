//! UCI options: `uci`'s `option` lines and `setoption` dispatch.
//!
//! The option set spec §6 mandates -- `Hash`, `Clear Hash`, `Ponder`,
//! `Threads`, `UCI_AnalyseMode` -- plus a handful of search-tuning spins
//! (`RFPMargin` and friends) this crate exposes the same way the teacher
//! exposed its own SPSA-tunable constants: extra `option` lines a GUI can
//! ignore, not a contradiction of anything spec.md rules out.

use crate::board::{SearchParams, SearchState, DEFAULT_TT_MB};

/// Minimum `Hash` value in MiB (spec §6).
pub const HASH_MIN_MB: usize = 5;
/// Maximum `Hash` value in MiB (spec §6).
pub const HASH_MAX_MB: usize = 500;

/// Print a UCI spin option.
fn print_spin(
    name: &str,
    default: impl std::fmt::Display,
    min: impl std::fmt::Display,
    max: impl std::fmt::Display,
) {
    println!("option name {name} type spin default {default} min {min} max {max}");
}

/// Print a UCI check option.
fn print_check(name: &str, default: bool) {
    println!(
        "option name {name} type check default {}",
        if default { "true" } else { "false" }
    );
}

/// Print a UCI button option (no value, triggered by name alone).
fn print_button(name: &str) {
    println!("option name {name} type button");
}

/// A side effect `setoption` produced that the shell must act on outside
/// of the option table itself (rebuilding the table, reconfiguring the
/// search thread's parallelism).
pub enum UciOptionAction {
    ReinitHash(usize),
    SetThreads(usize),
}

pub struct UciOptions {
    pub hash_mb: usize,
    pub threads: usize,
    pub ponder: bool,
    pub analyse_mode: bool,
    pub default_max_nodes: u64,
    pub move_overhead_ms: u64,
    pub soft_time_percent: u64,
    pub hard_time_percent: u64,
    pub multi_pv: u32,
}

impl UciOptions {
    #[must_use]
    pub fn new(hash_mb: usize) -> Self {
        UciOptions {
            hash_mb: hash_mb.clamp(HASH_MIN_MB, HASH_MAX_MB),
            threads: 1,
            ponder: false,
            analyse_mode: false,
            default_max_nodes: 0,
            move_overhead_ms: 50,
            soft_time_percent: 70,
            hard_time_percent: 90,
            multi_pv: 1,
        }
    }

    /// Print the `uci` handshake's `id`/`option`/`uciok` lines and reset
    /// tunables to their defaults (spec §4.3's `uci` row).
    pub fn print_and_reset(&mut self, params: &mut SearchParams) {
        *self = UciOptions::new(DEFAULT_TT_MB.clamp(HASH_MIN_MB, HASH_MAX_MB));
        *params = SearchParams::default();

        println!("id name Gambit");
        println!("id author the Gambit contributors");

        print_spin("Hash", self.hash_mb, HASH_MIN_MB, HASH_MAX_MB);
        print_button("Clear Hash");
        print_check("Ponder", self.ponder);
        print_spin("Threads", self.threads, 1, 256);
        print_check("UCI_AnalyseMode", self.analyse_mode);

        print_spin("Move Overhead", self.move_overhead_ms, 0, 1000);
        print_spin("Soft Time Percent", self.soft_time_percent, 1, 100);
        print_spin("Hard Time Percent", self.hard_time_percent, 1, 100);
        print_spin("Max Nodes", self.default_max_nodes, 0_u64, u64::MAX);
        print_spin("MultiPV", self.multi_pv, 1, 64);

        // Tunable search parameters (SPSA-style), a supplement beyond spec's
        // mandated option set.
        print_spin("RFPMargin", params.rfp_margin, 50, 300);
        print_spin("NullMoveReduction", params.null_reduction, 1, 5);
        print_spin("FutilityMargin", params.futility_margin, 50, 250);
        print_spin("IIRMinDepth", params.iir_min_depth, 3, 8);
        print_spin("LMRMinDepth", params.lmr_min_depth, 2, 6);

        println!("uciok");
    }

    pub fn apply_setoption(
        &mut self,
        name: &str,
        value: Option<&str>,
        state: &mut SearchState,
    ) -> Option<UciOptionAction> {
        let normalized = name.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "hash" => {
                let mb = value
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(self.hash_mb)
                    .clamp(HASH_MIN_MB, HASH_MAX_MB);
                self.hash_mb = mb;
                return Some(UciOptionAction::ReinitHash(mb));
            }
            "clear hash" => {
                return Some(UciOptionAction::ReinitHash(self.hash_mb));
            }
            "threads" => {
                let threads = value
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(1)
                    .clamp(1, 256);
                if threads != self.threads {
                    self.threads = threads;
                    return Some(UciOptionAction::SetThreads(threads));
                }
            }
            "ponder" => {
                if let Some(v) = value {
                    self.ponder = matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1");
                }
            }
            "uci_analysemode" => {
                if let Some(v) = value {
                    self.analyse_mode =
                        matches!(v.trim().to_ascii_lowercase().as_str(), "true" | "1");
                }
            }
            "move overhead" => {
                if let Some(v) = value.and_then(|v| v.parse::<u64>().ok()) {
                    self.move_overhead_ms = v;
                }
            }
            "soft time percent" => {
                if let Some(v) = value.and_then(|v| v.parse::<u64>().ok()) {
                    self.soft_time_percent = v.clamp(1, 100);
                }
            }
            "hard time percent" => {
                if let Some(v) = value.and_then(|v| v.parse::<u64>().ok()) {
                    self.hard_time_percent = v.clamp(1, 100);
                }
            }
            "max nodes" | "nodes" => {
                if let Some(v) = value.and_then(|v| v.parse::<u64>().ok()) {
                    self.default_max_nodes = v;
                }
            }
            "multipv" => {
                if let Some(v) = value.and_then(|v| v.parse::<u32>().ok()) {
                    self.multi_pv = v.clamp(1, 64);
                }
            }
            // Tunable search parameters (SPSA-style supplement)
            "rfpmargin" => {
                if let Some(v) = value.and_then(|v| v.parse::<i32>().ok()) {
                    state.params_mut().rfp_margin = v.clamp(50, 300);
                }
            }
            "nullmovereduction" => {
                if let Some(v) = value.and_then(|v| v.parse::<u32>().ok()) {
                    state.params_mut().null_reduction = v.clamp(1, 5);
                }
            }
            "futilitymargin" => {
                if let Some(v) = value.and_then(|v| v.parse::<i32>().ok()) {
                    state.params_mut().futility_margin = v.clamp(50, 250);
                }
            }
            "iirmindepth" => {
                if let Some(v) = value.and_then(|v| v.parse::<u32>().ok()) {
                    state.params_mut().iir_min_depth = v.clamp(3, 8);
                }
            }
            "lmrmindepth" => {
                if let Some(v) = value.and_then(|v| v.parse::<u32>().ok()) {
                    state.params_mut().lmr_min_depth = v.clamp(2, 6);
                }
            }
            // Unrecognized option name/value: silently ignored (spec §7).
            _ => {}
        }
        None
    }
}

#[must_use]
pub fn parse_setoption(parts: &[&str]) -> Option<(String, Option<String>)> {
    if parts.is_empty() || parts[0] != "setoption" {
        return None;
    }

    let mut name_parts: Vec<&str> = Vec::new();
    let mut value_parts: Vec<&str> = Vec::new();
    let mut mode = "";

    for part in parts.iter().skip(1) {
        match *part {
            "name" => mode = "name",
            "value" => mode = "value",
            _ => match mode {
                "name" => name_parts.push(part),
                "value" => value_parts.push(part),
                _ => {}
            },
        }
    }

    if name_parts.is_empty() {
        return None;
    }

    let name = name_parts.join(" ");
    let value = if value_parts.is_empty() {
        None
    } else {
        Some(value_parts.join(" "))
    };

    Some((name, value))
}
