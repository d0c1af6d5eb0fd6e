use std::process::Command;

/// Value from the environment (set by CI), else the first line of `cmd` output.
fn stamp(var: &str, program: &str, args: &[&str]) -> String {
    if let Ok(value) = std::env::var(var) {
        return value;
    }
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let sha = stamp("NBLOG_GIT_SHA", "git", &["rev-parse", "--short", "HEAD"]);
    let date = stamp("NBLOG_BUILD_DATE", "date", &["-u", "+%Y-%m-%d"]);

    println!("cargo:rustc-env=NBLOG_GIT_SHA={}", sha);
    println!("cargo:rustc-env=NBLOG_BUILD_DATE={}", date);
    println!("cargo:rerun-if-env-changed=NBLOG_GIT_SHA");
    println!("cargo:rerun-if-env-changed=NBLOG_BUILD_DATE");
}
