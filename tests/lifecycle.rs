//! Session Protocol Tests
//!
//! Drives a full `Session` against the deterministic mock engine to verify
//! the lifecycle and record-marshalling contract:
//! - Lifecycle violations never reach the engine
//! - Terminate is idempotent and guaranteed on drop
//! - Initialization performs exactly one engine step
//! - Advancing preserves the initial-velocity input field
//! - Elapsed simulated time is exact fixed-timestep accounting
//!
//! Run with: `cargo test --test lifecycle`

use vahana_io::{DynamicsEngine, Error, MockEngine, Session, SessionState};

/// Session plus a spy handle onto its engine
fn spied_session() -> (MockEngine, Session) {
    let engine = MockEngine::new();
    let session = Session::with_engine(Box::new(engine.clone()));
    (engine, session)
}

#[test]
fn advance_requires_initialize_for_any_call_sequence() {
    let (engine, mut session) = spied_session();

    for _ in 0..3 {
        assert!(matches!(
            session.advance(1.0, 0.0),
            Err(Error::InvalidState { .. })
        ));
    }
    assert_eq!(engine.step_calls(), 0, "rejected advance must not step the engine");

    session.initialize(1.0, 0.0, 5.0).unwrap();
    session.advance(1.0, 0.0).unwrap();
    session.terminate();

    assert!(matches!(
        session.advance(1.0, 0.0),
        Err(Error::InvalidState { .. })
    ));
    assert_eq!(engine.step_calls(), 2, "no step after terminate");
}

#[test]
fn terminate_twice_invokes_engine_once() {
    let (engine, mut session) = spied_session();
    session.initialize(0.0, 0.0, 0.0).unwrap();

    session.terminate();
    session.terminate();

    assert_eq!(engine.terminate_calls(), 1);
    assert_eq!(session.state(), SessionState::Terminated);
}

#[test]
fn terminate_before_initialize_does_not_touch_engine() {
    let (engine, mut session) = spied_session();
    session.terminate();
    assert_eq!(engine.terminate_calls(), 0);
    assert_eq!(session.state(), SessionState::Uninitialized);
}

#[test]
fn initialize_performs_exactly_one_step_and_returns_live_record() {
    let (engine, mut session) = spied_session();

    let obs = session.initialize(1.0, 0.1, 10.0).unwrap();

    assert_eq!(engine.initialize_calls(), 1);
    assert_eq!(engine.step_calls(), 1);

    // The returned observation equals the output record after that one step
    // and is not all-zero.
    let record = engine.read_output();
    assert_eq!(obs.vx, record.vx as f32);
    assert_eq!(obs.yaw, record.yaw as f32);
    assert!(obs.vx != 0.0);
}

#[test]
fn advance_writes_controls_and_preserves_v_ini() {
    let (engine, mut session) = spied_session();
    session.initialize(1.0, 0.1, 10.0).unwrap();

    session.advance(2.0, -0.3).unwrap();

    let input = engine.read_input();
    assert_eq!(input.sped, 2.0);
    assert_eq!(input.delta, -0.3);
    assert_eq!(input.v_ini, 10.0, "V_ini keeps its last-set value");
}

#[test]
fn elapsed_time_is_exact_step_accounting() {
    let (_engine, mut session) = spied_session();

    session.initialize(1.0, 0.0, 5.0).unwrap();
    let n = 250;
    for _ in 0..n {
        session.advance(1.0, 0.0).unwrap();
    }

    assert_eq!(session.steps(), n + 1);
    let expected = (n + 1) as f64 * session.timestep();
    assert!((session.elapsed() - expected).abs() < 1e-12);
}

#[test]
fn dropping_a_live_session_terminates_the_engine() {
    let (engine, mut session) = spied_session();
    session.initialize(1.0, 0.0, 5.0).unwrap();

    drop(session);

    assert_eq!(engine.terminate_calls(), 1);
}

#[test]
fn dropping_an_unused_session_makes_no_engine_calls() {
    let (engine, session) = spied_session();
    drop(session);
    assert_eq!(engine.terminate_calls(), 0);
}
