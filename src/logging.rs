use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::config::LoggingConfig;

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` wins over `level` when set. An invalid directive falls back
/// to `info`. Fails if a subscriber is already installed.
pub fn init_logging(cfg: &LoggingConfig) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if cfg.format.eq_ignore_ascii_case("json") {
        builder.json().finish().try_init()
    } else {
        builder.pretty().finish().try_init()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_fails() {
        let cfg = LoggingConfig {
            level: "debug,hyper=warn".into(),
            format: "json".into(),
        };
        // another test in this binary may have won the race already
        let _ = init_logging(&cfg);
        assert!(init_logging(&cfg).is_err());
    }
}
