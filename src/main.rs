//! UCI entry point. All engine logic lives in the `gambit` library crate;
//! this binary just owns the process and runs the command loop.

fn main() {
    gambit::uci::Shell::new().run();
}
