//! Engine backend over a precompiled dynamic module

use super::records::{ControlRecord, StateRecord};
use super::DynamicsEngine;
use crate::config::EngineConfig;
use crate::error::{Error, Result};

use libloading::{Library, Symbol};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

/// Modules currently claimed by a live [`LoadedEngine`]
///
/// The engine's records are module-global, not per-handle, so two sessions
/// driving the same loaded module would alias the same input/output memory.
/// Keyed by canonical path; a slot is released when the engine drops.
static CLAIMED_MODULES: Mutex<BTreeSet<PathBuf>> = Mutex::new(BTreeSet::new());

/// Dynamics engine loaded from a platform dynamic module
///
/// Resolves the entry points `{prefix}_initialize`, `{prefix}_step` and
/// `{prefix}_terminate` plus the global records `{prefix}_U` (input) and
/// `{prefix}_Y` (output). The module handle is held for the lifetime of the
/// engine so the resolved pointers stay valid; dropping the engine unloads
/// the module and releases its exclusive-use claim.
pub struct LoadedEngine {
    entry_initialize: unsafe extern "C" fn(),
    entry_step: unsafe extern "C" fn(),
    entry_terminate: unsafe extern "C" fn(),
    input: *mut ControlRecord,
    output: *const StateRecord,
    timestep: f64,
    module_path: PathBuf,
    // Keeps the module mapped; the pointers above borrow from it.
    _library: Library,
}

impl LoadedEngine {
    /// Load an engine module and resolve its exports
    ///
    /// Fails with [`Error::Load`] if the module cannot be opened,
    /// [`Error::MissingSymbol`] naming the first unresolvable export,
    /// [`Error::RecordLayout`] if a record symbol is not naturally aligned
    /// for f64 fields, or [`Error::ModuleInUse`] if another live engine
    /// already claims the same module.
    pub fn load(config: &EngineConfig) -> Result<Self> {
        let module_path =
            fs::canonicalize(&config.module_path).unwrap_or_else(|_| config.module_path.clone());

        log::info!("LoadedEngine: Loading engine module {}", module_path.display());
        // SAFETY: loading runs the module's initialization routines; an
        // engine module is assumed to be a plain code-generated artifact.
        let library = unsafe { Library::new(&module_path) }.map_err(|source| Error::Load {
            path: module_path.clone(),
            source,
        })?;

        let prefix = &config.symbol_prefix;
        let entry_initialize = resolve_entry(&library, &format!("{prefix}_initialize"))?;
        let entry_step = resolve_entry(&library, &format!("{prefix}_step"))?;
        let entry_terminate = resolve_entry(&library, &format!("{prefix}_terminate"))?;
        let input = resolve_record::<ControlRecord>(&library, &format!("{prefix}_U"))? as *mut _;
        let output = resolve_record::<StateRecord>(&library, &format!("{prefix}_Y"))?;

        {
            let mut claimed = CLAIMED_MODULES.lock();
            if !claimed.insert(module_path.clone()) {
                return Err(Error::ModuleInUse(module_path));
            }
        }

        log::info!(
            "LoadedEngine: Resolved `{}` exports, timestep {}s",
            prefix,
            config.timestep_s
        );

        Ok(Self {
            entry_initialize,
            entry_step,
            entry_terminate,
            input,
            output,
            timestep: config.timestep_s,
            module_path,
            _library: library,
        })
    }

    /// Canonical path of the loaded module
    pub fn module_path(&self) -> &PathBuf {
        &self.module_path
    }
}

impl DynamicsEngine for LoadedEngine {
    fn initialize(&mut self) {
        // SAFETY: parameterless entry point; module stays loaded while self lives.
        unsafe { (self.entry_initialize)() }
    }

    fn step(&mut self) {
        // SAFETY: as above. Lifecycle ordering is enforced by the session.
        unsafe { (self.entry_step)() }
    }

    fn terminate(&mut self) {
        // SAFETY: as above.
        unsafe { (self.entry_terminate)() }
    }

    fn write_controls(&mut self, sped: f64, delta: f64) {
        // SAFETY: `input` points at the module's global input record, valid
        // and exclusively ours while the claim is held.
        unsafe {
            (*self.input).sped = sped;
            (*self.input).delta = delta;
        }
    }

    fn write_initial_velocity(&mut self, v_ini: f64) {
        // SAFETY: as above.
        unsafe {
            (*self.input).v_ini = v_ini;
        }
    }

    fn read_input(&self) -> ControlRecord {
        // SAFETY: as above.
        unsafe { *self.input }
    }

    fn read_output(&self) -> StateRecord {
        // SAFETY: `output` points at the module's global output record; the
        // engine mutates it only inside `step`, which cannot run concurrently.
        unsafe { *self.output }
    }

    fn timestep(&self) -> f64 {
        self.timestep
    }
}

impl Drop for LoadedEngine {
    fn drop(&mut self) {
        log::info!(
            "LoadedEngine: Unloading engine module {}",
            self.module_path.display()
        );
        CLAIMED_MODULES.lock().remove(&self.module_path);
    }
}

/// Resolve a parameterless entry point, copying the function pointer out of
/// the borrowed symbol
fn resolve_entry(library: &Library, name: &str) -> Result<unsafe extern "C" fn()> {
    // SAFETY: the engine contract fixes all entry points as parameterless
    // with no return value.
    let symbol: Symbol<unsafe extern "C" fn()> =
        unsafe { library.get(name.as_bytes()) }.map_err(|source| Error::MissingSymbol {
            symbol: name.to_string(),
            source,
        })?;
    Ok(*symbol)
}

/// Resolve a global record export and check its alignment
fn resolve_record<T>(library: &Library, name: &str) -> Result<*const T> {
    // SAFETY: for a data export the symbol value is the address of the
    // record itself.
    let symbol: Symbol<*const T> =
        unsafe { library.get(name.as_bytes()) }.map_err(|source| Error::MissingSymbol {
            symbol: name.to_string(),
            source,
        })?;
    let ptr = *symbol;
    let align = std::mem::align_of::<T>();
    if (ptr as usize) % align != 0 {
        return Err(Error::RecordLayout(format!(
            "record `{}` at {:p} is not {}-byte aligned",
            name, ptr, align
        )));
    }
    Ok(ptr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_module_is_load_error() {
        let config = EngineConfig::for_module("/nonexistent/libvehiclemodel_public.so");
        match LoadedEngine::load(&config) {
            Err(Error::Load { path, .. }) => {
                assert!(path.to_string_lossy().contains("libvehiclemodel_public"));
            }
            other => panic!("expected Error::Load, got {:?}", other.err()),
        }
    }
}
