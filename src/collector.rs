use std::{
    env,
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Stdio},
};

use crate::config::{CiConfig, Config, VcsConfig, Workspace};
use crate::properties::BuildProperties;

const RUSTC_VERSION: &str = env!("BUILDSTAMP_RUSTC_VERSION");

#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("failed to run {command} in {dir}: {source}")]
    Spawn {
        command: String,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} describe exited with {status}:\n{output}")]
    Failed {
        command: String,
        status: ExitStatus,
        output: String,
    },
    #[error("failed to determine hostname: {0}")]
    Hostname(String),
}

/// Arguments for describing the checkout relative to the nearest release tag.
pub fn describe_args(vcs: &VcsConfig) -> Vec<String> {
    vec![
        "describe".to_string(),
        "--long".to_string(),
        "--dirty".to_string(),
        format!("--abbrev={}", vcs.abbrev),
        "--tags".to_string(),
        format!("--match={}*", vcs.tag_prefix),
        "--always".to_string(),
    ]
}

/// Runs the describe command in `run_dir` and returns stdout followed by stderr.
pub fn describe(vcs: &VcsConfig, run_dir: &Path) -> Result<String, CollectError> {
    let args = describe_args(vcs);
    tracing::debug!(command = %vcs.command, ?args, dir = %run_dir.display(), "describing checkout");
    let output = Command::new(&vcs.command)
        .args(&args)
        .current_dir(run_dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| CollectError::Spawn {
            command: vcs.command.clone(),
            dir: run_dir.to_path_buf(),
            source,
        })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
        return Err(CollectError::Failed {
            command: vcs.command.clone(),
            status: output.status,
            output: combined.trim().to_string(),
        });
    }
    Ok(combined)
}

pub fn local_hostname() -> Result<String, CollectError> {
    let raw = hostname::get().map_err(|err| CollectError::Hostname(err.to_string()))?;
    raw.into_string()
        .map_err(|raw| CollectError::Hostname(format!("not valid utf-8: {raw:?}")))
}

/// Build id from the CI variables; both must be present to replace the default.
pub fn build_id<F>(ci: &CiConfig, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match (lookup(&ci.pipeline_var), lookup(&ci.build_var)) {
        (Some(pipeline), Some(build)) => format!("Pipeline {pipeline} (Build {build})"),
        _ => ci.default_id.clone(),
    }
}

pub fn runtime_version() -> &'static str {
    RUSTC_VERSION
}

pub fn collect(config: &Config, workspace: &Workspace) -> Result<BuildProperties, CollectError> {
    collect_with(config, workspace, |key| env::var(key).ok())
}

pub fn collect_with<F>(
    config: &Config,
    workspace: &Workspace,
    lookup: F,
) -> Result<BuildProperties, CollectError>
where
    F: Fn(&str) -> Option<String>,
{
    let description = describe(&config.vcs, &workspace.run_dir())?;
    let hostname = local_hostname()?;
    let id = build_id(&config.ci, lookup);
    let props = BuildProperties::new(id, &description, hostname, runtime_version());
    tracing::info!(
        id = %props.id,
        description = %props.description,
        hostname = %props.hostname,
        "collected build properties"
    );
    Ok(props)
}
