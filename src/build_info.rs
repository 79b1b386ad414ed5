//! Build and runtime identification
//!
//! Compile-time metadata from `build.rs` plus the startup banner, which also
//! shows where reports are fetched from and written to.

use serde::Serialize;

use crate::config::ReportConfig;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("MEDINEXUS_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

/// `debug` or `release`
pub const BUILD_PROFILE: &str = match option_env!("MEDINEXUS_BUILD_PROFILE") {
    Some(s) => s,
    None => "unknown",
};

pub const BUILD_TARGET: &str = match option_env!("MEDINEXUS_BUILD_TARGET") {
    Some(s) => s,
    None => "unknown",
};

/// Release channel set through `MEDINEXUS_RELEASE_CHANNEL` at build time
pub const BUILD_CHANNEL: &str = match option_env!("MEDINEXUS_BUILD_CHANNEL") {
    Some(s) => s,
    None => "dev",
};

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub channel: &'static str,
    pub profile: &'static str,
    pub target: &'static str,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            channel: BUILD_CHANNEL,
            profile: BUILD_PROFILE,
            target: BUILD_TARGET,
            build_timestamp: BUILD_TIMESTAMP,
        }
    }

    /// One-line identifier, e.g. `1.0.0-dev (release, x86_64-unknown-linux-gnu)`
    pub fn describe(&self) -> String {
        format!("{}-{} ({}, {})", self.version, self.channel, self.profile, self.target)
    }
}

fn banner_lines(info: &BuildInfo, config: &ReportConfig) -> Vec<String> {
    let auth = if config.api_token.is_some() {
        "bearer token"
    } else {
        "none"
    };
    vec![
        "===============================================".to_string(),
        "  MediNexus Reports".to_string(),
        format!("  {}", info.describe()),
        format!("  Compiled: {}", info.build_timestamp),
        format!("  Reporting API: {} (auth: {})", config.api_base_url, auth),
        format!("  Exports: {}", config.export_dir.display()),
        "===============================================".to_string(),
    ]
}

/// Print the startup banner to stderr
pub fn print_startup_banner(config: &ReportConfig) {
    for line in banner_lines(&BuildInfo::current(), config) {
        eprintln!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_describe() {
        let info = BuildInfo {
            version: "1.2.0",
            channel: "stable",
            profile: "release",
            target: "x86_64-unknown-linux-gnu",
            build_timestamp: "2024-03-04T00:00:00Z",
        };
        assert_eq!(info.describe(), "1.2.0-stable (release, x86_64-unknown-linux-gnu)");
    }

    #[test]
    fn test_banner_shows_api_and_exports() {
        let config = ReportConfig::new("https://api.example.com/api", None, PathBuf::from("/srv/exports"));
        let lines = banner_lines(&BuildInfo::current(), &config);
        assert!(lines.iter().any(|l| l == "  Reporting API: https://api.example.com/api (auth: none)"));
        assert!(lines.iter().any(|l| l == "  Exports: /srv/exports"));
    }
}
