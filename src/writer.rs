use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

#[derive(Debug, thiserror::Error)]
#[error("failed to write {path}: {source}")]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Destination next to the generator's parent directory: for a generator at
/// `src/bin/buildstamp.rs` this is `src/<filename>`.
pub fn default_output_path(generator_source: &Path, filename: &str) -> PathBuf {
    let dir = generator_source.parent().unwrap_or_else(|| Path::new(""));
    let parent = dir.parent().unwrap_or(dir);
    parent.join(filename)
}

/// Creates or truncates `path` and writes `contents` to it.
pub fn write(path: &Path, contents: &str) -> Result<(), WriteError> {
    tracing::info!(path = %path.display(), bytes = contents.len(), "writing generated file");
    let to_error = |source: std::io::Error| WriteError {
        path: path.to_path_buf(),
        source,
    };
    let mut file = File::create(path).map_err(to_error)?;
    file.write_all(contents.as_bytes()).map_err(to_error)?;
    file.flush().map_err(to_error)
}
