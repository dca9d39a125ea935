//! Logging subsystem.
//!
//! SDK crates log through this facade rather than importing `tracing`
//! directly, so the host application controls whether and how a subscriber
//! is installed.

use once_cell::sync::OnceCell;
pub use tracing::{debug, error, event, info, instrument, trace, warn, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static SETUP: OnceCell<()> = OnceCell::new();

/// Install a console subscriber for the SDK crates.
///
/// Respects `RUST_LOG` when set; otherwise filters to the given level for
/// the SDK's own crates. Hosts that already run their own `tracing`
/// subscriber should skip this and the SDK's events will flow into it.
/// Calling it more than once is a no-op.
pub fn setup(default_level: Level) {
    SETUP.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "paysheet={default_level},cards={default_level},warn"
            ))
        });

        // try_init: the host may already have a global subscriber installed,
        // in which case ours silently stands down.
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init();
    });
}
