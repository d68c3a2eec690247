//! Tracing subscriber setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "keyaura=debug"
    } else {
        "keyaura=info"
    }
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `verbose`.
///
/// Output goes to stderr so stdout stays clean for `--json` output.
pub fn init_logging(verbose: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(verbose).into());

    // A second call (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
