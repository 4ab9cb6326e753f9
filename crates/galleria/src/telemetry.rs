//! Tracing subscriber setup for the binary.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose { "info,galleria=debug" } else { "warn,galleria=info" }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set. `json` switches to one JSON object per line,
/// for piping into log collectors.
pub fn init_telemetry(verbose: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    tracing::debug!(verbose, json, "Telemetry initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::default_filter;

    #[test]
    fn test_verbose_enables_debug_for_galleria() {
        assert!(default_filter(true).contains("galleria=debug"));
        assert!(!default_filter(false).contains("debug"));
    }
}
