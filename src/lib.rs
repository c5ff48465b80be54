pub mod config;
pub mod pipeline;
pub mod history; // Vitals store for the monitoring workflow
pub mod workflow;
pub mod report;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Logs go to stderr so command
/// output on stdout stays machine-readable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}
