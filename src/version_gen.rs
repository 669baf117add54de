//! Build identity metadata. THIS FILE IS AUTO GENERATED by `buildstamp`.
//!
//! It injects build information at compile time, either from a developer's
//! desk or from a CI pipeline. DO NOT HAND EDIT THIS FILE!
/// Build id from the build pipeline (`DEV` if this is a local build).
pub const ID: &str = "DEV";
/// Build description: nearest tag, commit distance, hash and dirty marker.
pub const DESCRIPTION: &str = "4c1f0a9e2b";
/// Hostname of the machine that ran `buildstamp`.
pub const HOSTNAME: &str = "localhost";
/// Rust toolchain used by `buildstamp`.
pub const RUNTIME: &str = "rustc 1.85.0 (4d91de4e4 2025-02-17)";
/// Returns all version information, one field per line.
pub fn summary() -> String {
    format!(
        "ID:          {ID}\nDescription: {DESCRIPTION}\nHostname:    {HOSTNAME}\nRuntime:     {RUNTIME}\n"
    )
}
