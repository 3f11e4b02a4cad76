//! Structured logging, controlled by the `RUST_LOG` environment variable.
//!
//! Default level is `warn`. Phase-level progress logs at `info`, per-sweep
//! detail at `debug`:
//!
//! ```bash
//! RUST_LOG=info puritymap Program.cs
//! RUST_LOG=puritymap=debug puritymap Program.cs
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber. Call once at startup; diagnostics go
/// to stderr so they never interleave with the report on stdout.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
