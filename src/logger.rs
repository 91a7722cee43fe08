use tracing_subscriber::EnvFilter;

/// Log directive for the quiet/verbose flags. `RUST_LOG` wins when set.
pub fn filter_directive(quiet: bool, verbose: bool) -> &'static str {
    if quiet {
        "batch_squeeze=error"
    } else if verbose {
        "batch_squeeze=debug"
    } else {
        "batch_squeeze=warn"
    }
}

/// Installs the global tracing subscriber, writing to stderr so that stdout
/// stays reserved for the command's own report.
pub fn init(quiet: bool, verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(quiet, verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_wins_over_verbose() {
        assert_eq!(filter_directive(true, true), "batch_squeeze=error");
        assert_eq!(filter_directive(false, true), "batch_squeeze=debug");
        assert_eq!(filter_directive(false, false), "batch_squeeze=warn");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(false, false);
        init(true, false);
    }
}
