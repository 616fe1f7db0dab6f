use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initializes tracing with console output, honoring `RUST_LOG`.
///
/// When a log directory is given, a daily-rotated file sink is added
/// alongside the console. The returned guard must be held for the life of
/// the process or buffered file output is lost on shutdown.
pub fn init(log_directory: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer());

    match log_directory {
        Some(directory) => {
            std::fs::create_dir_all(directory).expect("Failed to create log directory");
            let file_appender =
                RollingFileAppender::new(Rotation::DAILY, directory, "pushdeploy");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}
