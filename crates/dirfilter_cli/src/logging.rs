//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter (`EnvFilter` syntax).
pub const C_ENV_LOG_FILTER: &str = "DIRFILTER_LOG";

/// Install the global fmt subscriber writing to stderr.
///
/// `DIRFILTER_LOG` wins over the flags when set and valid.
pub fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env(C_ENV_LOG_FILTER)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose, quiet)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

fn default_level(verbose: bool, quiet: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    }
}

#[cfg(test)]
mod tests {
    use super::default_level;

    #[test]
    fn test_default_level() {
        assert_eq!(default_level(false, false), "info");
        assert_eq!(default_level(true, false), "debug");
        assert_eq!(default_level(false, true), "warn");
    }
}
