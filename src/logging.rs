use tracing_subscriber::EnvFilter;

/// Default filter when neither `--log-level` nor `HOTEL_LOG` is set.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Checks a `--log-level` value as an `EnvFilter` directive list.
pub fn parse_filter(value: &str) -> Result<String, String> {
    EnvFilter::try_new(value)
        .map(|_| value.to_owned())
        .map_err(|e| format!("invalid log filter '{value}': {e}"))
}

/// Installs the stderr subscriber. Stdout stays reserved for command output.
pub fn init(level: &str) {
    let (filter, rejected) = match EnvFilter::try_new(level) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new(DEFAULT_LOG_LEVEL), Some(e)),
    };

    // A subscriber may already be installed, e.g. by a test harness.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if let Some(e) = rejected {
        tracing::warn!(level, error = %e, "invalid log filter, using '{DEFAULT_LOG_LEVEL}'");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_filter_accepts_levels_and_targets() {
        assert_eq!(parse_filter("info").unwrap(), "info");
        assert_eq!(
            parse_filter("warn,hotel_records=debug").unwrap(),
            "warn,hotel_records=debug"
        );
    }

    #[test]
    fn parse_filter_rejects_unknown_level() {
        let err = parse_filter("hotel_records=loud").unwrap_err();

        assert!(err.contains("hotel_records=loud"));
    }
}
