// Minimal stderr backend for the `log` facade.
// Level comes from --verbose, then RUST_LOG, then defaults to warn.

use log::{LevelFilter, Log, Metadata, Record};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        eprintln!(
            "[{}] [{:>5}] {}: {}",
            timestamp_millis(),
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

/// Parse a `RUST_LOG`-style value.
///
/// Comma-separated directives are either a bare level or `target=level`.
/// A directive for this crate wins over a bare level; other targets are ignored.
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    let mut global = None;
    let mut own = None;

    for directive in value.split(',').map(str::trim).filter(|d| !d.is_empty()) {
        match directive.split_once('=') {
            Some((target, level)) => {
                let target = target.trim();
                if target == CRATE_TARGET || target.starts_with(&format!("{CRATE_TARGET}::")) {
                    own = LevelFilter::from_str(level.trim()).ok().or(own);
                }
            }
            None => global = LevelFilter::from_str(directive).ok().or(global),
        }
    }

    own.or(global)
}

fn level_from_env() -> Option<LevelFilter> {
    std::env::var("RUST_LOG").ok().as_deref().and_then(parse_level)
}

/// Install the logger. Safe to call more than once; later calls only adjust the level.
pub fn init(verbose: bool) {
    let _ = log::set_boxed_logger(Box::new(StderrLogger));

    let level = if verbose {
        LevelFilter::Debug
    } else {
        level_from_env().unwrap_or(LevelFilter::Warn)
    };
    log::set_max_level(level);
}

fn timestamp_millis() -> String {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    format!("{}.{:03}", now.as_secs(), now.subsec_millis())
}
