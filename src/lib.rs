//! VahanaIO - Session protocol for a precompiled vehicle dynamics engine
//!
//! The vehicle dynamics themselves live in an opaque precompiled module
//! exposing three entry points (`initialize`, `step`, `terminate`) and two
//! fixed-layout global records. This library provides the stateful façade
//! around them: the lifecycle state machine, input/output record
//! marshalling, and the fixed-timestep stepping contract.
//!
//! ## Quick start
//!
//! ```no_run
//! use vahana_io::Session;
//!
//! # fn main() -> vahana_io::Result<()> {
//! let mut session = Session::load("./libvehiclemodel_public.so")?;
//!
//! // Throttle, steering (rad), initial velocity (m/s)
//! let obs = session.initialize(1.0, 0.1, 10.0)?;
//! println!("X={:.2}m Vx={:.2}m/s", obs.x, obs.vx);
//!
//! // Each advance is exactly one engine timestep (0.01s)
//! let obs = session.advance(1.0, 0.05)?;
//! println!("yaw={:.4}rad r={:.4}rad/s", obs.yaw, obs.r);
//!
//! session.terminate();
//! # Ok(())
//! # }
//! ```
//!
//! Tests run against [`MockEngine`], a deterministic stand-in implementing
//! the same capability set without any loaded module.

pub mod config;
pub mod engine;
pub mod error;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use config::{Config, EngineConfig};
pub use engine::{ControlRecord, DynamicsEngine, LoadedEngine, MockEngine, StateRecord};
pub use error::{Error, Result};
pub use session::{Session, SessionState};
pub use types::Observation;
