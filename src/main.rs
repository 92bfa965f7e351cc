//! VahanaIO - Demo drive of a precompiled vehicle dynamics engine
//!
//! Loads the engine module named in the configuration, runs a fixed-input
//! drive (initialize, N advances, terminate) and logs the trajectory.

use std::env;
use std::path::Path;
use vahana_io::{Config, Result, Session};

/// Parse config path from command line arguments.
///
/// Supports:
/// - `vahana-io <path>` (positional)
/// - `vahana-io --config <path>` (flag-based)
/// - `vahana-io -c <path>` (short flag)
///
/// Defaults to `./vahana.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    // Look for --config or -c flag
    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    // Fall back to first positional argument (if it doesn't start with -)
    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    // Default path
    "./vahana.toml".to_string()
}

fn main() -> Result<()> {
    let config_path = parse_config_path();
    let config = if Path::new(&config_path).exists() {
        Config::from_file(&config_path)?
    } else {
        Config::defaults()
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("VahanaIO demo drive starting (config: {})", config_path);
    log::info!(
        "Engine module: {} (prefix `{}`, timestep {}s)",
        config.engine.module_path.display(),
        config.engine.symbol_prefix,
        config.engine.timestep_s
    );

    let mut session = Session::load_with(&config.engine)?;

    // 1. Initialize and report the starting observation
    let drive = &config.drive;
    let obs = session.initialize(drive.sped, drive.delta, drive.v_ini)?;
    log::info!(
        "Initialized: X={:.2}m Y={:.2}m yaw={:.4}rad Vx={:.2}m/s",
        obs.x,
        obs.y,
        obs.yaw,
        obs.vx
    );

    // 2. Drive with constant inputs
    for i in 0..drive.steps {
        let obs = session.advance(drive.sped, drive.delta)?;
        if (i + 1) % 10 == 0 || i + 1 == drive.steps {
            log::info!(
                "Step {:>4}: X={:.2}m Y={:.2}m yaw={:.4}rad Vx={:.2}m/s Vy={:.2}m/s r={:.4}rad/s",
                i + 1,
                obs.x,
                obs.y,
                obs.yaw,
                obs.vx,
                obs.vy,
                obs.r
            );
        }

        if obs.vx < 0.1 {
            log::info!("Vehicle stopped at step {}", i + 1);
            break;
        }
    }

    // 3. Shut down
    log::info!(
        "Drive complete: {} steps, {:.2}s simulated",
        session.steps(),
        session.elapsed()
    );
    session.terminate();

    Ok(())
}
