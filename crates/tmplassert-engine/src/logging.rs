//! Tracing setup for test runs

use std::sync::Once;

use tracing::Level;

static INIT: Once = Once::new();

/// Map a level name to a tracing level
pub fn parse_level(level: &str) -> Option<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        _ => None,
    }
}

/// Install a fmt subscriber writing through the test harness
///
/// Only the first call has any effect. Unknown levels fall back to `warn`.
pub fn init_test_logging(level: &str) {
    let max_level = parse_level(level).unwrap_or(Level::WARN);
    INIT.call_once(|| {
        // Another subscriber may already be installed by the test binary
        let _ = tracing_subscriber::fmt()
            .with_max_level(max_level)
            .with_test_writer()
            .try_init();
    });
}
