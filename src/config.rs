use std::{
    env,
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

pub const CONFIG_FILENAME: &str = "buildstamp.toml";
pub const PACKAGE_ENV: &str = "BUILDSTAMP_PACKAGE";
pub const SEARCH_PATH_ENV: &str = "BUILDSTAMP_SEARCH_PATH";

const DEFAULT_VCS_COMMAND: &str = "git";
const DEFAULT_TAG_PREFIX: &str = "v";
const DEFAULT_ABBREV: u8 = 10;
const DEFAULT_PIPELINE_VAR: &str = "CI_PIPELINE_ID";
const DEFAULT_BUILD_VAR: &str = "CI_BUILD_ID";
const DEFAULT_ID: &str = "DEV";
const DEFAULT_OUTPUT_FILENAME: &str = "version_gen.rs";

const MIN_ABBREV: u8 = 4;
const MAX_ABBREV: u8 = 40;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("${0} is not set in the environment")]
    MissingEnv(&'static str),
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables read from `buildstamp.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub vcs: VcsConfig,
    pub ci: CiConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VcsConfig {
    /// Executable used to describe the checkout.
    pub command: String,
    /// Only tags starting with this prefix are considered by describe.
    pub tag_prefix: String,
    /// Length of the abbreviated commit hash.
    pub abbrev: u8,
}

impl Default for VcsConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_VCS_COMMAND.to_string(),
            tag_prefix: DEFAULT_TAG_PREFIX.to_string(),
            abbrev: DEFAULT_ABBREV,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CiConfig {
    pub pipeline_var: String,
    pub build_var: String,
    /// Build id used when the CI variables are not both present.
    pub default_id: String,
}

impl Default for CiConfig {
    fn default() -> Self {
        Self {
            pipeline_var: DEFAULT_PIPELINE_VAR.to_string(),
            build_var: DEFAULT_BUILD_VAR.to_string(),
            default_id: DEFAULT_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            filename: DEFAULT_OUTPUT_FILENAME.to_string(),
        }
    }
}

/// Loads the config at `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let Some(path) = path else {
        tracing::debug!("no config file given, using defaults");
        return Ok(Config::default());
    };
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = raw.len(), "loaded buildstamp config");
    let config = parse_config(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate(&config)?;
    Ok(config)
}

fn parse_config(raw: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(raw)
}

pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.vcs.command.trim().is_empty() {
        return Err(ConfigError::Invalid("vcs.command must not be empty".into()));
    }
    if !(MIN_ABBREV..=MAX_ABBREV).contains(&config.vcs.abbrev) {
        return Err(ConfigError::Invalid(format!(
            "vcs.abbrev must be between {MIN_ABBREV} and {MAX_ABBREV}, got {}",
            config.vcs.abbrev
        )));
    }
    if config.ci.default_id.is_empty() {
        return Err(ConfigError::Invalid("ci.default_id must not be empty".into()));
    }
    let filename = &config.output.filename;
    if filename.is_empty() || Path::new(filename).file_name() != Some(OsStr::new(filename)) {
        return Err(ConfigError::Invalid(format!(
            "output.filename must be a bare file name, got '{filename}'"
        )));
    }
    Ok(())
}

/// Where the package being stamped lives, taken from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub package: String,
    pub search_path: PathBuf,
}

impl Workspace {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| {
            env::var_os(key).map(|value| value.to_string_lossy().into_owned())
        })
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let package = lookup(PACKAGE_ENV).ok_or(ConfigError::MissingEnv(PACKAGE_ENV))?;
        let search_path = lookup(SEARCH_PATH_ENV)
            .map(PathBuf::from)
            .ok_or(ConfigError::MissingEnv(SEARCH_PATH_ENV))?;
        Ok(Self {
            package,
            search_path,
        })
    }

    /// Directory the describe command runs in.
    pub fn run_dir(&self) -> PathBuf {
        self.search_path.join(&self.package)
    }
}
