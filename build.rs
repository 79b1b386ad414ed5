//! Build script for MediNexus Reports
//!
//! Embeds the build timestamp, profile and target triple so `report_status`
//! can tell which binary produced an export.

fn main() {
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=MEDINEXUS_RELEASE_CHANNEL");

    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    let channel = std::env::var("MEDINEXUS_RELEASE_CHANNEL").unwrap_or_else(|_| "dev".to_string());

    println!("cargo:rustc-env=MEDINEXUS_BUILD_TIMESTAMP={}", timestamp);
    println!("cargo:rustc-env=MEDINEXUS_BUILD_PROFILE={}", profile);
    println!("cargo:rustc-env=MEDINEXUS_BUILD_TARGET={}", target);
    println!("cargo:rustc-env=MEDINEXUS_BUILD_CHANNEL={}", channel);
}
