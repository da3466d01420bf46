use std::process::Command;

/// Short commit hash for the startup log line, `unknown` outside a checkout
fn git_hash() -> String {
    let Some(out) = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
    else {
        return "unknown".to_string();
    };

    let hash = String::from_utf8_lossy(&out.stdout).trim().to_string();
    let dirty = Command::new("git")
        .args(["diff", "--quiet"])
        .status()
        .map(|s| !s.success())
        .unwrap_or(false);
    if dirty { format!("{}-dirty", hash) } else { hash }
}

fn main() {
    let hash = std::env::var("VOLEY_CORE_BUILD_ID").unwrap_or_else(|_| git_hash());
    println!("cargo:rustc-env=GIT_HASH={}", hash);
    println!("cargo:rerun-if-env-changed=VOLEY_CORE_BUILD_ID");
    println!("cargo:rerun-if-changed=.git/HEAD");
}
