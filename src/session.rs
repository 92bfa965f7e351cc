//! Simulation session lifecycle and I/O-record protocol

use crate::config::EngineConfig;
use crate::engine::{ControlRecord, DynamicsEngine, LoadedEngine};
use crate::error::{Error, Result};
use crate::types::Observation;
use std::path::Path;

/// Session lifecycle state
///
/// `Terminated` is terminal; a terminated session cannot be revived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, engine not yet initialized
    Uninitialized,
    /// Engine initialized, stepping permitted
    Initialized,
    /// Engine released, no further stepping
    Terminated,
}

/// Stateful façade over a dynamics engine
///
/// Owns the engine handle exclusively, enforces the lifecycle state machine
/// (`Uninitialized → Initialized → Terminated`), marshals control inputs into
/// the engine's input record and surfaces typed observations from its output
/// record. One fixed timestep elapses per [`advance`](Session::advance) call.
///
/// Dropping a session terminates the engine, so the terminate entry point
/// runs on every exit path.
///
/// # Examples
///
/// ```
/// use vahana_io::{MockEngine, Session};
///
/// # fn main() -> vahana_io::Result<()> {
/// let mut session = Session::with_engine(Box::new(MockEngine::new()));
///
/// // Throttle 1.0, steering 0.1 rad, initial velocity 10 m/s
/// let first = session.initialize(1.0, 0.1, 10.0)?;
/// println!("starting at Vx = {:.2} m/s", first.vx);
///
/// for _ in 0..100 {
///     let obs = session.advance(1.0, 0.05)?;
///     if obs.vx < 0.1 {
///         break;
///     }
/// }
///
/// session.terminate();
/// # Ok(())
/// # }
/// ```
pub struct Session {
    /// Engine backend (exclusively owned)
    engine: Box<dyn DynamicsEngine>,

    /// Lifecycle state
    state: SessionState,

    /// Engine steps issued, including the one inside initialize
    steps: u64,

    /// Last observation read back from the engine
    last_observation: Option<Observation>,
}

impl Session {
    /// Create a session over an engine module at `path`
    ///
    /// Uses the default symbol prefix and timestep; see
    /// [`load_with`](Session::load_with) for non-default engine builds.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with(&EngineConfig::for_module(path))
    }

    /// Create a session over an engine module described by `config`
    pub fn load_with(config: &EngineConfig) -> Result<Self> {
        let engine = LoadedEngine::load(config)?;
        Ok(Self::with_engine(Box::new(engine)))
    }

    /// Create a session over an already-constructed engine backend
    ///
    /// This is the seam for supplying a [`MockEngine`](crate::MockEngine) in
    /// tests, or an engine loaded with non-default options.
    pub fn with_engine(engine: Box<dyn DynamicsEngine>) -> Self {
        log::info!("Session: Created (timestep {}s)", engine.timestep());
        Self {
            engine,
            state: SessionState::Uninitialized,
            steps: 0,
            last_observation: None,
        }
    }

    // === Lifecycle ===

    /// Initialize the engine and return the first observation
    ///
    /// Resets all engine-internal physical state, writes all three input
    /// fields, then performs exactly one engine step so the caller receives a
    /// concrete starting observation rather than an all-zero record. The
    /// returned observation therefore already reflects one timestep of
    /// dynamics under the given inputs, not time t=0.
    ///
    /// Re-initializing an `Initialized` session is permitted and is executed
    /// as terminate-then-initialize, starting a fresh run with its own
    /// elapsed-time accounting. A `Terminated` session rejects this with
    /// [`Error::InvalidState`].
    ///
    /// # Arguments
    /// * `sped` - Throttle (positive) / brake (negative) command, recommended [-1, 1]
    /// * `delta` - Front wheel steering angle in radians
    /// * `v_ini` - Initial longitudinal velocity in m/s
    pub fn initialize(&mut self, sped: f64, delta: f64, v_ini: f64) -> Result<Observation> {
        match self.state {
            SessionState::Terminated => {
                return Err(Error::InvalidState {
                    operation: "initialize",
                    state: self.state,
                });
            }
            SessionState::Initialized => {
                log::info!("Session: Re-initializing, releasing previous engine state");
                self.engine.terminate();
            }
            SessionState::Uninitialized => {}
        }

        log::info!(
            "Session: Initializing - sped={:.3}, delta={:.3}rad, v_ini={:.3}m/s",
            sped,
            delta,
            v_ini
        );

        self.engine.initialize();
        self.engine.write_controls(sped, delta);
        self.engine.write_initial_velocity(v_ini);

        // One step so the first observation is consistent with the inputs.
        self.engine.step();
        self.steps = 1;
        self.state = SessionState::Initialized;

        let observation = Observation::from(self.engine.read_output());
        self.last_observation = Some(observation);
        Ok(observation)
    }

    /// Advance the simulation by one fixed timestep
    ///
    /// Overwrites the throttle/brake and steering fields of the input record
    /// (the initial-velocity field keeps its last-set value), performs one
    /// engine step and reads back the observation. Callers needing coarser
    /// time resolution call this repeatedly.
    ///
    /// Fails with [`Error::InvalidState`] before [`initialize`](Session::initialize)
    /// or after [`terminate`](Session::terminate); no engine call is made in
    /// that case.
    pub fn advance(&mut self, sped: f64, delta: f64) -> Result<Observation> {
        if self.state != SessionState::Initialized {
            return Err(Error::InvalidState {
                operation: "advance",
                state: self.state,
            });
        }

        log::debug!("Session: Advance - sped={:.3}, delta={:.3}rad", sped, delta);

        self.engine.write_controls(sped, delta);
        self.engine.step();
        self.steps += 1;

        let observation = Observation::from(self.engine.read_output());
        self.last_observation = Some(observation);
        Ok(observation)
    }

    /// Terminate the engine
    ///
    /// Releases engine-held state and moves the session to `Terminated`.
    /// Idempotent no-op on an `Uninitialized` or already-`Terminated`
    /// session; never fails.
    pub fn terminate(&mut self) {
        match self.state {
            SessionState::Initialized => {
                log::info!(
                    "Session: Terminating after {} steps ({:.2}s simulated)",
                    self.steps,
                    self.elapsed()
                );
                self.engine.terminate();
                self.state = SessionState::Terminated;
            }
            SessionState::Uninitialized | SessionState::Terminated => {
                log::debug!("Session: Terminate ignored in state {:?}", self.state);
            }
        }
    }

    // === Accessors ===

    /// Re-read the current observation without advancing
    ///
    /// `None` until the first step has occurred. After termination the engine
    /// invalidates its records, so this returns the last observation read
    /// while the engine was live.
    pub fn observation(&self) -> Option<Observation> {
        match self.state {
            SessionState::Terminated => self.last_observation,
            _ if self.steps == 0 => None,
            _ => Some(Observation::from(self.engine.read_output())),
        }
    }

    /// Raw input record as the engine currently sees it
    pub fn raw_input(&self) -> ControlRecord {
        self.engine.read_input()
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether the session accepts [`advance`](Session::advance) calls
    pub fn is_initialized(&self) -> bool {
        self.state == SessionState::Initialized
    }

    /// Engine steps issued so far, including the one inside initialize
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Simulated seconds advanced per step (engine metadata)
    pub fn timestep(&self) -> f64 {
        self.engine.timestep()
    }

    /// Total elapsed simulated time in seconds
    ///
    /// Exactly `steps × timestep`; the step performed inside
    /// [`initialize`](Session::initialize) counts.
    pub fn elapsed(&self) -> f64 {
        self.steps as f64 * self.engine.timestep()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.terminate();
    }
}
