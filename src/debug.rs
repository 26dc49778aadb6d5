use log::{LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
/// Logging bridge for term-settings
///
/// Every `log::info!()` etc. from the settings crates is written to
/// /tmp/term_settings_debug.log on Unix/macOS, or
/// %TEMP%\term_settings_debug.log on Windows, so command output on stdout
/// stays machine-readable.
///
/// The level comes from the `--log-level` flag, then `RUST_LOG`, then `info`.
/// When either the flag or `RUST_LOG` is given, records are also mirrored to
/// stderr.
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// File + stderr logger behind the `log` facade
struct DebugLogger {
    file: Mutex<Option<File>>,
    mirror_to_stderr: bool,
}

impl DebugLogger {
    fn new(level: LevelFilter, mirror_to_stderr: bool) -> Self {
        let file = match OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(log_path())
        {
            Ok(mut f) => {
                let _ = write!(
                    f,
                    "\n{}\nterm-settings debug session started at {} (level={})\n{}\n",
                    "=".repeat(80),
                    get_timestamp(),
                    level,
                    "=".repeat(80)
                );
                Some(f)
            }
            // Silently fall back to stderr only
            Err(_) => None,
        };

        DebugLogger {
            file: Mutex::new(file),
            mirror_to_stderr,
        }
    }
}

impl Log for DebugLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(&get_timestamp(), record);
        if let Some(ref mut file) = *self.file.lock() {
            let _ = file.write_all(line.as_bytes());
        }
        if self.mirror_to_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(ref mut file) = *self.file.lock() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<DebugLogger> = OnceLock::new();

/// Path of the debug log file
pub fn log_path() -> PathBuf {
    #[cfg(unix)]
    {
        PathBuf::from("/tmp/term_settings_debug.log")
    }
    #[cfg(not(unix))]
    {
        std::env::temp_dir().join("term_settings_debug.log")
    }
}

fn get_timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

fn format_line(timestamp: &str, record: &Record) -> String {
    format!(
        "[{}] [{:<5}] [{}] {}\n",
        timestamp,
        record.level(),
        record.target(),
        record.args()
    )
}

/// Install the logger. Safe to call more than once; later calls are ignored.
pub fn init_log_bridge(cli_level: Option<LevelFilter>) {
    let env_level = std::env::var("RUST_LOG")
        .ok()
        .map(|value| value.trim().parse().unwrap_or(LevelFilter::Info));
    let level = cli_level.or(env_level).unwrap_or(LevelFilter::Info);
    let mirror = cli_level.is_some() || env_level.is_some();

    let logger = LOGGER.get_or_init(|| DebugLogger::new(level, mirror));
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}
