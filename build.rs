//! Build script for persona-sim
//!
//! Embeds build-time information into the binary so `persona-sim version`
//! can report exactly what was built:
//! - Git commit hash, branch and dirty flag
//! - Build timestamp
//! - Target/host triples and profile
//! - Rust version

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let git_hash = command_stdout("git", &["rev-parse", "--short=8", "HEAD"]);
    let git_branch = command_stdout("git", &["rev-parse", "--abbrev-ref", "HEAD"]);
    let git_dirty = match Command::new("git").args(["status", "--porcelain"]).output() {
        Ok(output) if output.status.success() => {
            if output.stdout.is_empty() {
                "false"
            } else {
                "true"
            }
        }
        _ => "unknown",
    };

    let build_timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let rustc_version = command_stdout("rustc", &["--version"]);

    let vars = [
        ("PERSONA_SIM_GIT_HASH", git_hash),
        ("PERSONA_SIM_GIT_BRANCH", git_branch),
        ("PERSONA_SIM_GIT_DIRTY", git_dirty.to_string()),
        ("PERSONA_SIM_BUILD_TIMESTAMP", build_timestamp),
        ("PERSONA_SIM_TARGET", cargo_var("TARGET")),
        ("PERSONA_SIM_PROFILE", cargo_var("PROFILE")),
        ("PERSONA_SIM_RUSTC_VERSION", rustc_version),
        ("PERSONA_SIM_HOST", cargo_var("HOST")),
    ];

    for (key, value) in &vars {
        println!("cargo:rustc-env={}={}", key, value);
    }
}

/// Read a cargo-provided build variable, falling back to "unknown"
fn cargo_var(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| "unknown".to_string())
}

/// Run a command and return its trimmed stdout, or "unknown" on any failure
fn command_stdout(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}
