use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::report::ReportFonts;

/// Authority settings, read from the environment with local-development
/// defaults.
///
/// | Env Var                | Default                 |
/// |------------------------|-------------------------|
/// | `HOST`                 | `0.0.0.0`               |
/// | `PORT`                 | `5000`                  |
/// | `CORS_ORIGINS`         | `http://localhost:5173` |
/// | `REQUEST_TIMEOUT_SECS` | `30`                    |
/// | `DATA_DIR`             | `data`                  |
/// | `REPORT_FONT_DIR`      | unset (embedded fonts)  |
/// | `REPORT_FONT_NAME`     | `DejaVuSans`            |
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated in `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Saved collections and the board image live here.
    pub data_dir: PathBuf,
    /// On-disk font family directory; `None` uses the embedded faces.
    pub report_font_dir: Option<PathBuf>,
    /// Font family base name (`<name>-Regular.ttf`, `<name>-Bold.ttf`, ...).
    pub report_font_name: String,
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a numeric variable; a present but invalid value aborts startup.
fn parsed_var<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a number, got '{raw}'")),
        Err(_) => default,
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parsed_var("PORT", 5000),
            cors_origins: split_origins(&var_or("CORS_ORIGINS", "http://localhost:5173")),
            request_timeout_secs: parsed_var("REQUEST_TIMEOUT_SECS", 30),
            data_dir: var_or("DATA_DIR", "data").into(),
            report_font_dir: std::env::var("REPORT_FONT_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            report_font_name: var_or("REPORT_FONT_NAME", "DejaVuSans"),
        }
    }

    /// Socket address to bind; fails when `HOST` is not an IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| format!("HOST '{}' is not an IP address: {e}", self.host))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn report_fonts(&self) -> ReportFonts {
        ReportFonts {
            dir: self.report_font_dir.clone(),
            name: self.report_font_name.clone(),
        }
    }
}
