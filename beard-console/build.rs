//! Build identification for the startup log line
//!
//! Sets `GIT_HASH`, `BUILD_TIMESTAMP` and `BUILD_PROFILE` for `env!`.

use std::process::Command;

fn main() {
    // Re-stamp when the checked-out commit moves
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=build.rs");

    let stamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=GIT_HASH={}", short_commit().as_deref().unwrap_or("unknown"));
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", stamp);
    println!("cargo:rustc-env=BUILD_PROFILE={}", profile);
}

/// Short hash of HEAD, with a `-dirty` suffix for uncommitted changes
fn short_commit() -> Option<String> {
    let head = git(&["rev-parse", "--short=8", "HEAD"])?;
    let dirty = git(&["status", "--porcelain", "--untracked-files=no"])
        .map(|status| !status.is_empty())
        .unwrap_or(false);

    Some(if dirty { format!("{}-dirty", head) } else { head })
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_string())
}
