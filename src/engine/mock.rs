//! Mock engine for hardware-free testing
//!
//! Deterministic stand-in for the precompiled engine. Implements a minimal
//! kinematic bicycle so that control inputs produce plausible trajectories,
//! and counts entry-point invocations so tests can use it as a call spy.
//! Not a reproduction of the real engine's dynamics.

use super::records::{ControlRecord, StateRecord};
use super::DynamicsEngine;
use std::f64::consts::{PI, TAU};
use std::sync::{Arc, Mutex};

/// Timestep of the known engine builds, reused by the mock
const MOCK_TIMESTEP: f64 = 0.01;

/// Wheelbase of the simulated vehicle (meters)
const WHEELBASE: f64 = 2.7;

/// Longitudinal acceleration per unit of throttle command (m/s^2)
const DRIVE_GAIN: f64 = 5.0;

/// Velocity-proportional drag coefficient (1/s)
const DRAG: f64 = 0.1;

/// Deterministic mock dynamics engine
///
/// Clones share state, so a test can hand one clone to a
/// [`Session`](crate::Session) and keep another to inspect call counts and
/// the raw input record.
#[derive(Clone)]
pub struct MockEngine {
    inner: Arc<Mutex<MockEngineInner>>,
}

struct MockEngineInner {
    input: ControlRecord,
    output: StateRecord,
    // Engine-retained state; the output record is a projection of this.
    vehicle: VehicleState,
    // Set by initialize, consumed by the next step to seed vx from V_ini.
    pending_reset: bool,
    initialize_calls: u32,
    step_calls: u32,
    terminate_calls: u32,
}

#[derive(Default)]
struct VehicleState {
    x: f64,
    y: f64,
    yaw: f64,
    vx: f64,
    vy: f64,
    r: f64,
}

impl MockEngine {
    /// Create a new mock engine with zeroed records
    pub fn new() -> Self {
        MockEngine {
            inner: Arc::new(Mutex::new(MockEngineInner {
                input: ControlRecord::default(),
                output: StateRecord::default(),
                vehicle: VehicleState::default(),
                pending_reset: false,
                initialize_calls: 0,
                step_calls: 0,
                terminate_calls: 0,
            })),
        }
    }

    /// Number of initialize entry-point invocations
    pub fn initialize_calls(&self) -> u32 {
        self.inner.lock().unwrap().initialize_calls
    }

    /// Number of step entry-point invocations
    pub fn step_calls(&self) -> u32 {
        self.inner.lock().unwrap().step_calls
    }

    /// Number of terminate entry-point invocations
    pub fn terminate_calls(&self) -> u32 {
        self.inner.lock().unwrap().terminate_calls
    }
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicsEngine for MockEngine {
    fn initialize(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        inner.initialize_calls += 1;
        inner.vehicle = VehicleState::default();
        inner.output = StateRecord::default();
        inner.pending_reset = true;
        log::debug!("MockEngine: initialized (call #{})", inner.initialize_calls);
    }

    fn step(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        inner.step_calls += 1;
        inner.integrate(MOCK_TIMESTEP);
    }

    fn terminate(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        inner.terminate_calls += 1;
        log::debug!("MockEngine: terminated (call #{})", inner.terminate_calls);
    }

    fn write_controls(&mut self, sped: f64, delta: f64) {
        let mut inner = self.inner.lock().unwrap();
        inner.input.sped = sped;
        inner.input.delta = delta;
    }

    fn write_initial_velocity(&mut self, v_ini: f64) {
        let mut inner = self.inner.lock().unwrap();
        inner.input.v_ini = v_ini;
    }

    fn read_input(&self) -> ControlRecord {
        self.inner.lock().unwrap().input
    }

    fn read_output(&self) -> StateRecord {
        self.inner.lock().unwrap().output
    }

    fn timestep(&self) -> f64 {
        MOCK_TIMESTEP
    }
}

impl MockEngineInner {
    /// Advance the kinematic bicycle by one timestep
    fn integrate(&mut self, dt: f64) {
        if self.pending_reset {
            self.vehicle.vx = self.input.v_ini;
            self.pending_reset = false;
        }

        let v = &mut self.vehicle;

        // Longitudinal: throttle/brake command against velocity drag
        v.vx += (DRIVE_GAIN * self.input.sped - DRAG * v.vx) * dt;

        // Kinematic bicycle: no lateral slip
        v.r = v.vx * self.input.delta.tan() / WHEELBASE;
        v.vy = 0.0;
        v.yaw = normalize_angle(v.yaw + v.r * dt);

        v.x += v.vx * v.yaw.cos() * dt;
        v.y += v.vx * v.yaw.sin() * dt;

        self.output = StateRecord {
            x: v.x,
            y: v.y,
            yaw: v.yaw,
            vx: v.vx,
            vy: v.vy,
            r: v.r,
        };
    }
}

/// Normalize angle to [-PI, PI)
fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}
