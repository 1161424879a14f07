//! Structured logging for the Veld terrain tools.
//!
//! Span-based, filterable logging via the `tracing` ecosystem: console
//! output with timestamps and module paths, plus an optional plain-text
//! log file for post-mortem analysis of long generation runs.

use std::path::Path;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes the tracing subscriber.
///
/// Console output goes to stderr with module targets and an uptime timer.
/// When `log_dir` is given, a `veld.log` file in that directory receives
/// the same events without ANSI codes. The filter honors `RUST_LOG` and
/// falls back to [`default_env_filter`].
///
/// # Examples
///
/// ```no_run
/// veld_log::init_logging(None);
///
/// let log_dir = std::path::Path::new("./logs");
/// veld_log::init_logging(Some(log_dir));
/// ```
pub fn init_logging(log_dir: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_env_filter());

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
        && let Ok(log_file) = std::fs::File::create(log_dir.join("veld.log"))
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime());

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// The default filter: `info` everywhere, `debug` for the worldgen crate
/// so cache eviction and placement events show up during development.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new("info,veld_worldgen=debug")
}
