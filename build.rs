use std::env;
use std::process::Command;

fn main() {
    // Source revision marker for the version string: VCS_REF, then git, then "n/a".
    let vcs_ref = env::var("VCS_REF")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(git_short_head)
        .unwrap_or_else(|| "n/a".to_string());

    println!("cargo:rustc-env=ASSH_VCS_REF={}", vcs_ref);
    println!("cargo:rerun-if-env-changed=VCS_REF");
    println!("cargo:rerun-if-changed=.git/HEAD");
}

fn git_short_head() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let head = String::from_utf8(output.stdout).ok()?;
    let head = head.trim();
    if head.is_empty() {
        None
    } else {
        Some(head.to_string())
    }
}
