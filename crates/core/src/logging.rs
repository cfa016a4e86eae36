//! Tracing subscriber setup driven by the `logging` config section.
//!
//! The library itself only emits events; an embedding application calls
//! [`init_logging`] once at startup. Repeated calls are harmless no-ops so
//! several entry points (binaries, test harnesses) can share the helper.

use tracing::Level;

use crate::config::{LogFormat, LoggingConfig};

/// Install a global subscriber per the configured level and format. Returns
/// whether this call installed it; `false` means one was already set.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let log_level = config.level.parse::<Level>().unwrap_or(Level::INFO);

    let installed = match config.format {
        LogFormat::Compact => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .compact()
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .pretty()
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .with_target(false)
            .with_max_level(log_level)
            .json()
            .try_init(),
    };

    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use crate::config::{LogFormat, LoggingConfig};

    use super::init_logging;

    #[test]
    fn repeated_initialization_is_a_no_op() {
        let compact = LoggingConfig { level: "debug".to_string(), format: LogFormat::Compact };
        let json = LoggingConfig { level: "nonsense".to_string(), format: LogFormat::Json };

        // Whichever call lands first wins; later calls must not panic. An
        // unparsable level falls back to INFO instead of erroring.
        let first = init_logging(&compact);
        let second = init_logging(&json);
        assert!(!(first && second));
        assert!(!init_logging(&compact));
    }
}
