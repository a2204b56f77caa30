//! End-to-end walkthrough: a device walks a corridor while three wall-mounted
//! anchors range against it once per second and the dead-reckoning pipeline
//! reports one step every half second.
//!
//! Run with `RUST_LOG=debug cargo run --example corridor_walk` to see the
//! engine's lifecycle logging.

use indoor_fusion::{
    Anchor, DisplacementEvent, FixFormatter, FusionOrchestrator, FusionUpdate, RangeReading,
    SnapshotRecord, TextFormatter,
};

fn exact_readings(truth: (f64, f64), anchors: &[(&str, f64, f64)]) -> Vec<RangeReading> {
    anchors
        .iter()
        .map(|&(id, x, y)| {
            let d = ((truth.0 - x).powi(2) + (truth.1 - y).powi(2)).sqrt();
            RangeReading::new(id, d, 0.3)
        })
        .collect()
}

fn main() {
    env_logger::init();

    let anchors = [
        ("ap-lobby", 0.0, 0.0),
        ("ap-stairs", 20.0, 0.0),
        ("ap-break-room", 10.0, 6.0),
    ];

    let mut engine = FusionOrchestrator::default();
    for &(id, x, y) in &anchors {
        engine.registry_mut().insert(Anchor::new(id, x, y));
    }

    let formatter = TextFormatter;
    engine.register_callback(Box::new(move |update: &FusionUpdate| {
        let record = SnapshotRecord::new(update, None);
        println!("  -> {}", formatter.format(&record));
    }));

    // Steps land before the first ranging cycle: dropped, nothing published.
    engine
        .handle_displacement(DisplacementEvent::new(0.7, 0.0, 250))
        .unwrap();

    // Walk east along y = 2 at 0.7 m per step, one ranging cycle per second.
    let mut truth_x = 2.0;
    for second in 0..5u64 {
        let now_ms = 1_000 * (second + 1);

        println!("ranging cycle at t={}s", second + 1);
        engine
            .handle_ranging(&exact_readings((truth_x, 2.0), &anchors), now_ms)
            .unwrap();

        for half in 0..2u64 {
            truth_x += 0.7;
            engine
                .handle_displacement(DisplacementEvent::new(0.7, 0.0, now_ms + 250 + half * 500))
                .unwrap();
        }
    }

    let last = engine.latest().expect("engine published at least one fix");
    println!(
        "final fused estimate: ({:.2}, {:.2}) m, sigma {:.2} m",
        last.x, last.y, last.sigma
    );

    engine.reset();
    assert!(engine.latest().is_none());
}
