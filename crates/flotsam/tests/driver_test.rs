use flotsam::{
    Algorithm, Bubble, ForceOptions, LayoutDriver, PassState, RelaxationOptions, Viewport,
};

fn bubble(id: &str, risk: f64, radius: f64, volume_rank: usize) -> Bubble {
    Bubble::new(id, risk, radius, volume_rank)
}

fn batch_driver() -> LayoutDriver {
    LayoutDriver::new(
        Viewport::new(400.0, 400.0),
        Algorithm::Relaxation(RelaxationOptions::default()),
    )
}

fn tick_driver() -> LayoutDriver {
    LayoutDriver::new(
        Viewport::new(400.0, 400.0),
        Algorithm::Force(ForceOptions {
            random_seed: 9,
            ..ForceOptions::default()
        }),
    )
}

/// A pile of same-risk bubbles; keeps a force pass busy for several ticks.
fn crowded_set(prefix: &str, count: usize) -> Vec<Bubble> {
    (0..count)
        .map(|i| bubble(&format!("{prefix}{i}"), 50.0, 15.0, i))
        .collect()
}

#[test]
fn driver_starts_idle_and_stays_idle_without_data() {
    let mut driver = batch_driver();
    assert_eq!(driver.state(), PassState::Idle);
    assert!(driver.advance().unwrap().is_none());
    assert_eq!(driver.state(), PassState::Idle);
}

#[test]
fn driver_resize_before_any_data_does_not_start_a_pass() {
    let mut driver = batch_driver();
    driver.resize(Viewport::new(800.0, 600.0));
    assert!(driver.advance().unwrap().is_none());
    assert_eq!(driver.state(), PassState::Idle);
    assert_eq!(driver.generation(), 0);
}

#[test]
fn driver_settles_a_batch_pass_in_one_advance_then_goes_quiet() {
    let mut driver = batch_driver();
    driver.submit(vec![bubble("a", 10.0, 20.0, 0), bubble("b", 80.0, 20.0, 1)]);

    let snapshot = driver.advance().unwrap().expect("settled snapshot");
    assert!(snapshot.settled);
    assert_eq!(snapshot.generation, 1);
    assert_eq!(snapshot.positions.len(), 2);
    assert_eq!(driver.state(), PassState::Settled);
    assert!(driver.settled_result().is_some());

    assert!(driver.advance().unwrap().is_none());
    assert_eq!(driver.state(), PassState::Settled);
}

#[test]
fn driver_coalesces_a_resize_storm_into_one_pass() {
    let mut driver = batch_driver();
    driver.submit(vec![bubble("a", 10.0, 20.0, 0)]);
    driver.advance().unwrap().expect("first settle");
    assert_eq!(driver.generation(), 1);

    // A drag gesture delivers a flood of sizes between two ticks.
    for w in 0..100 {
        driver.resize(Viewport::new(300.0 + w as f64, 300.0));
    }
    let snapshot = driver.advance().unwrap().expect("recompute after resize");
    assert_eq!(snapshot.generation, 2, "one recompute for the whole storm");
    assert!(driver.advance().unwrap().is_none());
    assert_eq!(driver.generation(), 2);
}

#[test]
fn driver_recomputes_on_data_change_from_settled() {
    let mut driver = batch_driver();
    driver.submit(vec![bubble("a", 10.0, 20.0, 0)]);
    driver.advance().unwrap().expect("first settle");

    driver.submit(vec![bubble("b", 60.0, 20.0, 0), bubble("c", 70.0, 20.0, 1)]);
    let snapshot = driver.advance().unwrap().expect("second settle");
    assert_eq!(snapshot.generation, 2);
    assert!(snapshot.positions.contains_key("b"));
    assert!(!snapshot.positions.contains_key("a"));
}

#[test]
fn driver_cancels_an_in_flight_tick_pass_when_new_data_arrives() {
    let mut driver = tick_driver();
    driver.submit(crowded_set("a", 10));

    let first = driver.advance().unwrap().expect("tick 1");
    assert_eq!(first.generation, 1);
    assert!(!first.settled, "a crowded pile must not settle in one tick");
    let second = driver.advance().unwrap().expect("tick 2");
    assert!(!second.settled);
    assert_eq!(driver.state(), PassState::Computing);

    // New fetch result lands mid-pass: pass A dies, pass B takes over.
    driver.submit(crowded_set("b", 10));
    let mut saw_settled = false;
    for _ in 0..500 {
        let Some(snapshot) = driver.advance().unwrap() else {
            break;
        };
        assert_eq!(
            snapshot.generation, 2,
            "a superseded pass delivered a snapshot"
        );
        assert!(snapshot.positions.keys().all(|id| id.starts_with('b')));
        if snapshot.settled {
            saw_settled = true;
        }
    }
    assert!(saw_settled);
    assert_eq!(driver.state(), PassState::Settled);
}

#[test]
fn driver_settles_an_empty_submission_with_no_positions() {
    let mut driver = batch_driver();
    driver.submit(Vec::new());
    let snapshot = driver.advance().unwrap().expect("empty settle");
    assert!(snapshot.settled);
    assert!(snapshot.positions.is_empty());
    assert_eq!(driver.state(), PassState::Settled);
}

#[test]
fn driver_reports_duplicate_ids_once_and_stays_usable() {
    let mut driver = batch_driver();
    driver.submit(vec![bubble("dup", 10.0, 20.0, 0), bubble("dup", 20.0, 20.0, 1)]);
    assert!(driver.advance().is_err());

    driver.submit(vec![bubble("ok", 10.0, 20.0, 0)]);
    let snapshot = driver.advance().unwrap().expect("recovered");
    assert!(snapshot.settled);
    assert_eq!(snapshot.positions.len(), 1);
}

#[test]
fn driver_cancel_without_new_input_returns_to_rest() {
    let mut driver = tick_driver();
    driver.submit(crowded_set("a", 10));
    driver.advance().unwrap().expect("tick 1");
    assert_eq!(driver.state(), PassState::Computing);

    driver.cancel();
    assert_eq!(driver.state(), PassState::Idle);
    assert!(driver.advance().unwrap().is_none());
}
