use std::sync::mpsc;
use std::time::{Duration, Instant};

use gambit::engine::{EngineController, SearchParams};

#[test]
fn engine_depth_search_returns_move() {
    let mut controller = EngineController::new(16);
    let (tx, rx) = mpsc::channel();

    controller.start_search(
        SearchParams {
            depth: Some(1),
            ..Default::default()
        },
        move |result| {
            let _ = tx.send(result);
        },
    );

    let result = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("search did not complete");
    // At depth 1 we should always have at least one legal move from the starting position
    assert!(result.best_move.is_some());
}

#[test]
fn engine_time_limited_search_returns_move_within_time() {
    let mut controller = EngineController::new(16);
    let (tx, rx) = mpsc::channel();
    let start = Instant::now();

    controller.start_search(
        SearchParams {
            soft_time_ms: 50,
            hard_time_ms: 200,
            ..Default::default()
        },
        move |result| {
            let _ = tx.send(result);
        },
    );

    let _result = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("time-limited search failed to complete");
    assert!(start.elapsed() < Duration::from_secs(5));
}
