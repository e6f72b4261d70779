//! Shared runtime for gisload.
//!
//! ## Logging
//!
//! - [`log()`] — Terminal + per-run file logging for binaries
//!
//! ## Control
//!
//! - [`Policy`] — Whether database failures are swallowed or returned
//! - [`Decide`] — Yes/no decision providers (scripted or interactive)
mod decide;
mod policy;

pub use decide::*;
pub use policy::*;

use std::io;
use std::path::Path;
use std::path::PathBuf;

/// Directory that receives one log file per run.
pub const LOG_DIR: &str = "logs";

/// Sends records at `level` and above to the terminal and every record
/// down to `Debug` to a fresh file under [`LOG_DIR`].
///
/// Returns the file's path. Fails if the file cannot be created or a
/// logger is already installed.
pub fn log(level: log::LevelFilter) -> io::Result<PathBuf> {
    let path = logfile(Path::new(LOG_DIR))?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug.max(level),
        config.clone(),
        std::fs::File::create(&path)?,
    );
    let term = simplelog::TermLogger::new(
        level,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).map_err(io::Error::other)?;
    Ok(path)
}

/// `dir/gisload-<unix seconds>.log`, creating `dir` if needed.
fn logfile(dir: &Path) -> io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    Ok(dir.join(format!("gisload-{}.log", secs)))
}
