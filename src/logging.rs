use std::sync::OnceLock;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static INIT: OnceLock<()> = OnceLock::new();

/// Default filter directive: warnings only, or this crate at debug level
/// with `--verbose` while other crates stay at warn.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,centre_rank=debug"
    } else {
        "warn"
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides the default.
///
/// Safe to call multiple times - only the first call has effect.
pub fn init(verbose: bool) {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init();
    });
}
