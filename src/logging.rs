//! stderr logging via `tracing-subscriber`.
//!
//! `RUST_LOG` takes precedence when set; otherwise `--quiet` selects error
//! level and each `-v` raises the level from info to debug to trace.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(determine_level(verbose, quiet).into())
        .from_env_lossy();

    // A subscriber may already be installed (tests, embedding callers).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .try_init();
}

fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::ERROR
    } else {
        match verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_info() {
        assert_eq!(determine_level(0, false), LevelFilter::INFO);
    }

    #[test]
    fn verbosity_steps() {
        assert_eq!(determine_level(1, false), LevelFilter::DEBUG);
        assert_eq!(determine_level(2, false), LevelFilter::TRACE);
        assert_eq!(determine_level(5, false), LevelFilter::TRACE);
    }

    #[test]
    fn quiet_wins_over_verbose() {
        assert_eq!(determine_level(2, true), LevelFilter::ERROR);
    }

    #[test]
    fn init_twice_does_not_panic() {
        init_logging(0, true);
        init_logging(1, false);
    }
}
