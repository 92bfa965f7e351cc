//! Engine I/O record layouts
//!
//! The engine module exports two global records with a fixed field order and
//! 64-bit float width. The engine cannot validate the shape of the memory it
//! is given, so any layout drift on this side yields silently corrupted
//! physics rather than an error. The structs below pin the layout with
//! compile-time assertions.

/// Control inputs consumed by the engine on each step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct ControlRecord {
    /// Throttle (positive) / brake (negative) command, recommended [-1, 1]
    pub sped: f64,
    /// Front wheel steering angle in radians
    pub delta: f64,
    /// Initial longitudinal velocity in m/s, read by the engine at initialization
    pub v_ini: f64,
}

/// Vehicle state produced by the engine after each step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(C)]
pub struct StateRecord {
    /// X position in meters
    pub x: f64,
    /// Y position in meters
    pub y: f64,
    /// Yaw angle in radians
    pub yaw: f64,
    /// Body-frame longitudinal velocity in m/s
    pub vx: f64,
    /// Body-frame lateral velocity in m/s
    pub vy: f64,
    /// Yaw rate in rad/s
    pub r: f64,
}

/// Expected size of the engine's input record: three consecutive f64 fields
pub const CONTROL_RECORD_SIZE: usize = 3 * 8;

/// Expected size of the engine's output record: six consecutive f64 fields
pub const STATE_RECORD_SIZE: usize = 6 * 8;

const _: () = assert!(std::mem::size_of::<ControlRecord>() == CONTROL_RECORD_SIZE);
const _: () = assert!(std::mem::size_of::<StateRecord>() == STATE_RECORD_SIZE);
const _: () = assert!(std::mem::align_of::<ControlRecord>() == 8);
const _: () = assert!(std::mem::align_of::<StateRecord>() == 8);
