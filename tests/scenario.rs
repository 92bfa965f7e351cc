//! Reference Drive Scenario
//!
//! The reference scenario from the engine's demo material: initialize with
//! throttle 1.0, steering 0.1 rad and 10 m/s initial velocity, then 100
//! constant-input advances and a clean terminate. Verifies the observation
//! values a caller relies on when seeding an episode.
//!
//! Run with: `cargo test --test scenario`

use approx::assert_relative_eq;
use vahana_io::{MockEngine, Session, SessionState};

#[test]
fn reference_drive_completes_without_lifecycle_errors() {
    let mut session = Session::with_engine(Box::new(MockEngine::new()));

    // Near-straight initial condition: Vx seeded by v_ini, small yaw response
    let obs = session.initialize(1.0, 0.1, 10.0).unwrap();
    assert_relative_eq!(obs.vx, 10.0, max_relative = 0.05);
    assert!(obs.yaw.abs() < 0.05, "yaw after one step should be small");
    assert!(obs.r.abs() < 1.0, "yaw rate should be moderate");

    let mut last = obs;
    for _ in 0..100 {
        last = session
            .advance(1.0, 0.05)
            .expect("advance on an initialized session must not fail");
    }

    // Constant throttle keeps the vehicle moving; gentle steering curves it.
    assert!(last.vx > 0.0);
    assert!(last.yaw > obs.yaw);
    assert_relative_eq!(session.elapsed(), 1.01, max_relative = 1e-9);

    session.terminate();
    assert_eq!(session.state(), SessionState::Terminated);

    // The final observation stays readable after termination.
    assert_eq!(session.observation(), Some(last));
}

#[test]
fn reinitialize_starts_a_fresh_run() {
    let engine = MockEngine::new();
    let mut session = Session::with_engine(Box::new(engine.clone()));

    session.initialize(1.0, 0.1, 10.0).unwrap();
    for _ in 0..50 {
        session.advance(1.0, 0.1).unwrap();
    }
    let drifted = session.observation().unwrap();
    assert!(drifted.yaw.abs() > 0.0);

    // Re-init releases engine state and restarts the clock.
    let fresh = session.initialize(1.0, 0.0, 4.0).unwrap();
    assert_eq!(engine.terminate_calls(), 1);
    assert_relative_eq!(fresh.vx, 4.0, max_relative = 0.05);
    assert_eq!(session.steps(), 1);

    // The fresh run is fully steppable.
    for _ in 0..10 {
        session.advance(1.0, 0.0).unwrap();
    }
    assert_eq!(session.steps(), 11);
}

#[test]
fn observation_rereads_without_advancing() {
    let engine = MockEngine::new();
    let mut session = Session::with_engine(Box::new(engine.clone()));

    assert_eq!(session.observation(), None);

    let obs = session.initialize(1.0, 0.0, 10.0).unwrap();
    let steps_before = engine.step_calls();

    assert_eq!(session.observation(), Some(obs));
    assert_eq!(session.observation(), Some(obs));
    assert_eq!(engine.step_calls(), steps_before, "observation must not step");
}
