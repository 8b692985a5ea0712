#![allow(missing_docs)]

fn main() {
    // trap: docs.rs builds don't get a git short hash
    let hash = git_short_hash().unwrap_or("unknown".into());
    let cargo_version = env!("CARGO_PKG_VERSION");
    println!("cargo:rustc-env=PARANOID_OPENVPN_VERSION_STRING={cargo_version}+g{hash}");
}

fn git_short_hash() -> Option<String> {
    use std::process::Command;
    let args = &["rev-parse", "--short=8", "HEAD"];
    if let Ok(output) = Command::new("git").args(args).output() {
        let rev = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if rev.is_empty() {
            None
        } else {
            Some(rev)
        }
    } else {
        None
    }
}
