use std::path::PathBuf;
use std::time::Duration;

/// Console configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the authority (default: `http://127.0.0.1:5000`).
    pub authority_url: String,
    /// Per-request timeout in seconds (default: `30`).
    pub timeout_secs: u64,
    /// Where exports and reports are written (default: `.`).
    pub output_dir: PathBuf,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                  |
    /// |--------------------------|--------------------------|
    /// | `AUTHORITY_URL`          | `http://127.0.0.1:5000`  |
    /// | `AUTHORITY_TIMEOUT_SECS` | `30`                     |
    /// | `OUTPUT_DIR`             | `.`                      |
    pub fn from_env() -> Self {
        let authority_url =
            std::env::var("AUTHORITY_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".into());

        let timeout_secs: u64 = std::env::var("AUTHORITY_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30);

        let output_dir = std::env::var("OUTPUT_DIR").unwrap_or_else(|_| ".".into());

        Self {
            authority_url,
            timeout_secs,
            output_dir: output_dir.into(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
