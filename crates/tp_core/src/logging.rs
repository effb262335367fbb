use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Tags log lines with the stage they come from, e.g. `📂 category`.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    prefixes: Vec<String>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(&self, prefix: impl Into<String>) -> Self {
        let mut prefixes = self.prefixes.clone();
        prefixes.push(prefix.into());
        Self { prefixes }
    }

    pub fn prefix(&self) -> String {
        self.prefixes.iter().map(|p| format!("{} ", p)).collect()
    }

    pub fn info(&self, message: &str) {
        tracing::info!("{}{}", self.prefix(), message);
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!("{}{}", self.prefix(), message);
    }

    pub fn error(&self, message: &str) {
        tracing::error!("{}{}", self.prefix(), message);
    }

    pub fn debug(&self, message: &str) {
        tracing::debug!("{}{}", self.prefix(), message);
    }
}

/// Installs the global subscriber once. Honors `RUST_LOG`, defaults to `info`.
///
/// Logs go to stderr so they do not interleave with the interactive menu on stdout.
pub fn init_logging() -> Logger {
    if !tracing::dispatcher::has_been_set() {
        INIT.call_once(|| {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        });
    }
    Logger::new()
}
