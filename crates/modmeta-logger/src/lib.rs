//! Logging for generator runs inside build scripts
//!
//! Build scripts cannot talk to the terminal directly: cargo swallows their
//! stderr unless the build fails, and only `cargo:warning=` lines on stdout
//! reach the user. Every message therefore goes to a log file in `OUT_DIR`,
//! and warnings/errors are additionally forwarded to cargo.

use parking_lot::{const_mutex, Mutex};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Log file name created inside the log directory
pub const LOG_FILE_NAME: &str = "modmeta.log";

static LOG_FILE: Mutex<Option<PathBuf>> = const_mutex(None);
static VERBOSITY: Mutex<u8> = const_mutex(0);
static CARGO_WARNINGS: Mutex<bool> = const_mutex(false);

/// Get the current verbosity level
pub fn get_verbosity() -> u8 {
    *VERBOSITY.lock()
}

/// Whether warnings are forwarded as `cargo:warning=` lines
pub fn get_cargo_warnings() -> bool {
    *CARGO_WARNINGS.lock()
}

/// Enable or disable forwarding of warnings to cargo
pub fn set_cargo_warnings(enabled: bool) {
    *CARGO_WARNINGS.lock() = enabled;
}

/// Initialize the logger with a log directory and verbosity level
///
/// The log file is truncated so it only ever describes the latest run. A
/// `tracing` subscriber writing to the same file is installed when none is
/// set yet, so events from the library crates end up next to these lines.
pub fn init_with_verbosity(
    verbosity: u8,
    log_dir: &Path,
    cargo_warnings: bool,
) -> Result<(), String> {
    *VERBOSITY.lock() = verbosity;
    set_cargo_warnings(cargo_warnings);

    fs::create_dir_all(log_dir)
        .map_err(|e| format!("Failed to create log directory: {}", e))?;

    let log_file = log_dir.join(LOG_FILE_NAME);
    File::create(&log_file).map_err(|e| format!("Failed to create log file: {}", e))?;
    *LOG_FILE.lock() = Some(log_file.clone());

    init_tracing(verbosity, &log_file);
    Ok(())
}

fn init_tracing(verbosity: u8, log_file: &Path) {
    let Ok(file) = OpenOptions::new().create(true).append(true).open(log_file) else {
        return;
    };
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    // A subscriber may already be installed by the host build script.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(level))
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

/// Get the log file path, if the logger was initialized
pub fn get_log_path() -> Option<PathBuf> {
    LOG_FILE.lock().clone()
}

fn write_to_log(level: &str, message: &str) {
    let Some(log_path) = get_log_path() else {
        return;
    };
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(log_path) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(file, "[{}] {} {}", timestamp, level, message);
    }
}

fn forward_to_cargo(message: &str) {
    if get_cargo_warnings() {
        // cargo reads one directive per line
        for line in message.lines() {
            println!("cargo:warning={}", line);
        }
    }
}

/// Log an informational message
pub fn info(message: &str) {
    write_to_log("INFO", message);
}

/// Log a debug message (only when verbosity >= 1)
pub fn debug(message: &str) {
    if get_verbosity() >= 1 {
        write_to_log("DEBUG", message);
    }
}

/// Log a step of the pipeline (only when verbosity >= 2)
pub fn step(message: &str) {
    if get_verbosity() >= 2 {
        write_to_log("STEP", message);
    }
}

/// Log a warning message (to file and cargo)
pub fn warn(message: &str) {
    write_to_log("WARN", message);
    forward_to_cargo(message);
}

/// Log an error message (to file and cargo)
pub fn error(message: &str) {
    write_to_log("ERROR", message);
    forward_to_cargo(&format!("error: {}", message));
}
