use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set. Logs go to stderr; stdout carries the
/// per-file report. Fails if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), TryInitError> {
    let default_directive = if verbose {
        "figcaption_helper=debug"
    } else {
        "figcaption_helper=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_reported() {
        init_tracing(false).unwrap();
        assert!(init_tracing(true).is_err());
    }
}
