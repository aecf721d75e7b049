use std::env;

fn main() {
    // Expose the crate version under a stable name for the user agent and `--version`
    let version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());
    println!("cargo:rustc-env=SAFEROUTE_VERSION={}", version);

    println!("cargo:rerun-if-changed=src/");
    println!("cargo:rerun-if-changed=Cargo.toml");
}
