//! Logging initialization with tracing

use anyhow::Result;

/// Initialize tracing subscriber for logging
///
/// Configures the tracing subscriber with:
/// - Environment filter from `RUST_LOG` (defaults to WARN level)
/// - Stderr output (to avoid mixing with command output)
///
/// # Errors
/// Returns an error if the subscriber initialization fails
pub fn init_tracing() -> Result<()> {
    let result = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing::Level::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .try_init();
    result.map_err(|e| anyhow::anyhow!("Failed to initialize tracing subscriber: {e}"))
}
