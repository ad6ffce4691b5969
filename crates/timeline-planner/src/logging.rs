//! Logging bootstrap.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered at `level`.
///
/// `RUST_LOG` takes precedence when set. Returns `false` if a global
/// subscriber was already installed, which leaves that one in place.
pub fn init_logging(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("timeline_planner={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_refused() {
        init_logging("debug");
        assert!(!init_logging("info"));
    }
}
