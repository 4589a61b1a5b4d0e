// Path: crates/node/src/telemetry.rs

//! Structured logging initialization.
//!
//! Logs are JSON on stderr; stdout belongs to the transport. Records carry
//! no local timestamps: replicas execute the same rounds at different wall
//! times, and stamping events locally would make otherwise identical
//! replica logs diff dirty. The collecting host stamps arrival time
//! instead, and in-round ordering is already fixed by the runtime.

use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// The filter applied when `RUST_LOG` is unset: dependencies at `warn`,
/// every `xvault`-scoped target at `info` so operational events and the
/// `xvault::audit` stream stay on even in a quiet deployment.
const DEFAULT_DIRECTIVES: &str = "warn,xvault=info";

/// Initializes the global `tracing` subscriber for the contract process.
pub fn init_tracing() -> Result<(), anyhow::Error> {
    let fmt_layer = fmt::layer()
        .json()
        .without_time()
        .with_writer(std::io::stderr)
        .with_target(true);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(Registry::default().with(filter).with(fmt_layer))?;
    Ok(())
}
