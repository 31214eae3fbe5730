//! Structured logging for drainwatch
//!
//! Thin setup over `env_logger` with a fixed timestamp format so analysis
//! traces line up with the timestamps in the battery log being analyzed.

use std::io::Write;
use std::sync::Once;

use chrono::Local;
use log::LevelFilter;

/// Timestamp format for log entries
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Global initialization guard
static INIT_LOGGER: Once = Once::new();

/// Initialize the logger with the default level (info, overridable via `RUST_LOG`).
pub fn init_logger() {
    init_logger_with_level(LevelFilter::Info);
}

/// Initialize the logger with an explicit default level filter.
///
/// Safe to call more than once; only the first call takes effect.
pub fn init_logger_with_level(level: LevelFilter) {
    INIT_LOGGER.call_once(|| {
        let env = env_logger::Env::default().default_filter_or(level.to_string());
        env_logger::Builder::from_env(env)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "[{}] {:5} [{}] {}",
                    Local::now().format(TIMESTAMP_FORMAT),
                    record.level(),
                    record.module_path().unwrap_or("<unknown>"),
                    record.args()
                )
            })
            .try_init()
            .ok();
    });
}
