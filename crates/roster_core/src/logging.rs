//! Rolling file logs for the roster core.
//!
//! # Responsibility
//! - Start one `flexi_logger` backend per process from a level + directory.
//! - Record panics as one-line events before the default hook runs.
//!
//! # Invariants
//! - Events carry ids, counts and status codes only; names and ages typed
//!   by the user never reach a log line.
//! - A second `init_logging` with the same config is a no-op; a different
//!   config is refused.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, LogSpecification, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::path::PathBuf;

const LOG_BASENAME: &str = "roster";
const ROTATE_AT_BYTES: u64 = 4 * 1024 * 1024;
const KEPT_LOG_FILES: usize = 3;
const PANIC_SUMMARY_CHARS: usize = 120;

static ACTIVE: OnceCell<(LogConfig, LoggerHandle)> = OnceCell::new();

/// Validated logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub dir: PathBuf,
}

impl LogConfig {
    /// Parses the raw level/directory pair handed over by FFI or CLI.
    ///
    /// `warning` is accepted as `warn`; `off` is rejected because a caller
    /// that wants no logs simply does not initialize them.
    pub fn parse(level: &str, dir: &str) -> Result<Self, String> {
        let level = match level.trim().to_ascii_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" | "warning" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            other => {
                return Err(format!(
                    "unsupported log level `{other}`; expected trace|debug|info|warn|error"
                ))
            }
        };

        let dir = PathBuf::from(dir.trim());
        if dir.as_os_str().is_empty() {
            return Err("log directory cannot be empty".to_string());
        }
        if !dir.is_absolute() {
            return Err(format!(
                "log directory must be absolute, got `{}`",
                dir.display()
            ));
        }

        Ok(Self { level, dir })
    }
}

/// Starts file logging, or confirms it already runs with the same config.
///
/// # Errors
/// Returns a readable message for bad input, a conflicting earlier
/// config, or a backend that fails to start.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let requested = LogConfig::parse(level, log_dir)?;
    let (active, _) = ACTIVE.get_or_try_init(|| start_backend(&requested))?;

    if *active != requested {
        return Err(format!(
            "logging already runs at {} in `{}`; refusing {} in `{}`",
            active.level,
            active.dir.display(),
            requested.level,
            requested.dir.display()
        ));
    }
    Ok(())
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_backend(config: &LogConfig) -> Result<(LogConfig, LoggerHandle), String> {
    std::fs::create_dir_all(&config.dir)
        .map_err(|err| format!("cannot create `{}`: {err}", config.dir.display()))?;

    let spec = LogSpecification::builder().default(config.level).build();
    let handle = Logger::with(spec)
        .log_to_file(
            FileSpec::default()
                .directory(config.dir.as_path())
                .basename(LOG_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEPT_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("logger backend failed to start: {err}"))?;

    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let at = panic_info
            .location()
            .map_or_else(|| "unknown".to_string(), |loc| format!("{}:{}", loc.file(), loc.line()));
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| panic_info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("non-string payload");
        error!(
            "event=panic module=roster status=error at={at} payload={}",
            one_line(payload, PANIC_SUMMARY_CHARS)
        );
        previous_hook(panic_info);
    }));

    info!(
        "event=logging_start module=roster status=ok version={} os={} level={}",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        config.level
    );
    Ok((config.clone(), handle))
}

/// Flattens newlines and caps the length of a free-text payload.
fn one_line(text: &str, max_chars: usize) -> String {
    let mut flat: String = text
        .chars()
        .map(|ch| if ch == '\n' || ch == '\r' { ' ' } else { ch })
        .take(max_chars)
        .collect();
    if text.chars().nth(max_chars).is_some() {
        flat.push_str("...");
    }
    flat
}
