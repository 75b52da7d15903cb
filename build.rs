use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let git_hash = command_output("git", &["rev-parse", "--short", "HEAD"])
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".into());
    emit("SUBTRACK_BUILD_HASH", &git_hash);

    let git_status = match command_output("git", &["status", "--porcelain"]) {
        Some(changes) if changes.is_empty() => "clean",
        Some(_) => "dirty",
        None => "unknown",
    };
    emit("SUBTRACK_BUILD_STATUS", git_status);

    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    emit("SUBTRACK_BUILD_TIMESTAMP", &timestamp);

    for (var, key) in [
        ("TARGET", "SUBTRACK_BUILD_TARGET"),
        ("PROFILE", "SUBTRACK_BUILD_PROFILE"),
    ] {
        let value = env::var(var).unwrap_or_else(|_| "unknown".into());
        emit(key, &value);
    }

    let rustc = command_output("rustc", &["--version"]).unwrap_or_else(|| "unknown".into());
    emit("SUBTRACK_BUILD_RUSTC", &rustc);
}

fn emit(key: &str, value: &str) {
    println!("cargo:rustc-env={key}={value}");
}

fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}
