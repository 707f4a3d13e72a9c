//! Logging and tracing configuration
//!
//! Console output for humans goes to stdout through the reporters; tracing
//! events go to stderr and, during a run, to a log file next to the reports.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("nasa_mock_runner=info,warn"))
}

/// Initialize tracing for commands that do not run collections (stderr only)
///
/// Logs are controlled by the `RUST_LOG` environment variable.
/// Default level is INFO for this crate, WARN for dependencies.
pub fn init_cli() {
    tracing_subscriber::registry()
        .with(default_filter())
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

/// Initialize tracing for a collection run (stderr + log file)
///
/// The file layer records at debug level for this crate regardless of
/// `RUST_LOG`, so every fixture server request ends up in the log. The
/// returned guard flushes the file writer when dropped; keep it alive for the
/// whole run.
pub fn init_run(log_file: &Path) -> Option<WorkerGuard> {
    let dir = log_file.parent().unwrap_or(Path::new("."));
    let file_name = log_file.file_name().unwrap_or_else(|| "harness.log".as_ref());

    if let Err(e) = std::fs::create_dir_all(dir) {
        eprintln!("Warning: Could not create log directory {}: {}", dir.display(), e);
        init_cli();
        return None;
    }

    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(EnvFilter::new("nasa_mock_runner=debug,info"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(default_filter());

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Some(guard)
}
