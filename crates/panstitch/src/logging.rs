//! Logger setup for the CLI.

use env_logger::Env;
use env_logger::fmt::TimestampPrecision;

/// Filter used unless `RUST_LOG` is set.
#[must_use]
pub const fn default_filter(debug: bool) -> &'static str {
    if debug {
        "panstitch=debug"
    } else {
        "panstitch=info"
    }
}

/// Install the global logger, writing to stderr with second timestamps.
///
/// The `panstitch` filter also covers the `panstitch_io` and
/// `panstitch_pipeline` targets. Calling this twice is harmless; the
/// second logger is discarded.
pub fn init(debug: bool) {
    let env = Env::default().default_filter_or(default_filter(debug));
    let result = env_logger::Builder::from_env(env)
        .format_timestamp(Some(TimestampPrecision::Seconds))
        .try_init();
    if let Err(err) = result {
        log::debug!("Logger already installed: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_raises_the_default_level() {
        assert_eq!(default_filter(false), "panstitch=info");
        assert_eq!(default_filter(true), "panstitch=debug");
    }

    #[test]
    fn init_twice_does_not_panic() {
        init(false);
        init(true);
    }
}
