//! Tracing subscriber setup for the command-line tools

use std::io::IsTerminal;
use std::sync::OnceLock;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Install the global fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level is `info`, or `debug`
/// when `debug` is set. Later calls are ignored.
pub fn init_tracing(debug: bool) {
    if INITIALISED.set(()).is_err() {
        return;
    }

    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal());

    // Another subscriber may already be installed by an embedding application
    let _ = Registry::default().with(filter).with(fmt_layer).try_init();
}
