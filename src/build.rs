use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output();
    // an empty hash hides it in the footer
    let git_hash_short = match output {
        Ok(output) if output.status.success() => String::from_utf8(output.stdout)
            .map(|hash| hash.trim().to_string())
            .unwrap_or_default(),
        _ => String::new(),
    };
    println!("cargo:rustc-env=GIT_HASH_SHORT={git_hash_short}");
}
