//! Log output for the server.
//!
//! Events go through `tracing` and are printed by `tracing_subscriber::fmt`,
//! either human-readable (`pretty`) or one JSON object per line (`json`).
//! Verbosity follows `RUST_LOG` and defaults to `info`.
//!
//! ```bash
//! RUST_LOG=seqpage=debug,info cargo run --bin seqpage-server -- --log-format json
//! ```

use crate::server::config::LogFormat;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry(format: LogFormat) -> anyhow::Result<()> {
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()));

    match format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_thread_ids(true)
                    .with_line_number(true)
                    .with_target(false)
                    .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                    .with_file(true)
                    .pretty(),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_thread_ids(true)
                    .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
                    .json(),
            )
            .try_init()?,
    }

    Ok(())
}
