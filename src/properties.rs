/// Build identity metadata stamped into the generated module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildProperties {
    /// Pipeline build id, or the configured default for local builds.
    pub id: String,
    /// `git describe` output: tag, distance, abbreviated hash, dirty marker.
    pub description: String,
    /// Hostname of the machine that ran the generator.
    pub hostname: String,
    /// Rust toolchain that built the generator.
    pub runtime: String,
}

impl BuildProperties {
    pub fn new(
        id: impl Into<String>,
        description: &str,
        hostname: impl Into<String>,
        runtime: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.trim().to_string(),
            hostname: hostname.into(),
            runtime: runtime.into(),
        }
    }
}
