//! Runtime configuration
//!
//! Read once at startup and passed to the components that need it.

use std::path::PathBuf;

use tracing::warn;

pub const ENV_API_URL: &str = "MEDINEXUS_API_URL";
pub const ENV_API_TOKEN: &str = "MEDINEXUS_API_TOKEN";
pub const ENV_EXPORT_DIR: &str = "MEDINEXUS_EXPORT_DIR";

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Base URL of the reporting API, without trailing slash
    pub api_base_url: String,
    /// Bearer token sent with report requests
    pub api_token: Option<String>,
    /// Directory exports are written to
    pub export_dir: PathBuf,
}

impl ReportConfig {
    pub fn new(api_base_url: impl Into<String>, api_token: Option<String>, export_dir: PathBuf) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.filter(|t| !t.trim().is_empty()),
            export_dir,
        }
    }

    pub fn from_env() -> Self {
        let api_base_url = std::env::var(ENV_API_URL).unwrap_or_else(|_| {
            warn!("{} not set, using {}", ENV_API_URL, DEFAULT_API_URL);
            DEFAULT_API_URL.to_string()
        });

        let api_token = std::env::var(ENV_API_TOKEN).ok();
        if api_token.is_none() {
            warn!("{} not set, report requests will be unauthenticated", ENV_API_TOKEN);
        }

        Self::new(api_base_url, api_token, default_export_dir())
    }
}

/// Export directory from environment, or `exports/` at the project root
fn default_export_dir() -> PathBuf {
    std::env::var(ENV_EXPORT_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("exports");
            path
        })
}
