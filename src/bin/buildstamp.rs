use std::{
    env,
    io::{self, IsTerminal, Write},
    path::{Path, PathBuf},
};

use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use buildstamp::{collector, config, render, version_gen, writer};

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_SHA"), ")");

#[derive(Debug, Parser)]
#[command(
    name = "buildstamp",
    version = VERSION,
    about = "Generate a Rust module describing the current build"
)]
struct Cli {
    /// Path to buildstamp.toml
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    config: Option<PathBuf>,
    /// Write the generated module here instead of next to the generator
    #[arg(short = 'o', long = "output", value_name = "PATH", conflicts_with = "stdout")]
    output: Option<PathBuf>,
    /// Print the generated module instead of writing it
    #[arg(long)]
    stdout: bool,
}

fn main() -> Result<()> {
    init_tracing();
    color_eyre::install()?;

    let cli = Cli::parse();
    tracing::debug!(
        id = version_gen::ID,
        description = version_gen::DESCRIPTION,
        "buildstamp build"
    );

    let config = config::load_config(cli.config.as_deref())?;
    let workspace = config::Workspace::from_env()?;
    tracing::info!(package = %workspace.package, "generating version module");

    let props = collector::collect(&config, &workspace)?;

    let source = match render::render(&props) {
        Ok(source) => source,
        Err(err) => {
            if let Some(unformatted) = err.unformatted() {
                tracing::error!(error = %err, "generate error\n{unformatted}");
            }
            return Err(err.into());
        }
    };

    if cli.stdout {
        let mut stdout = io::stdout().lock();
        stdout.write_all(source.as_bytes())?;
        stdout.flush()?;
        return Ok(());
    }

    let path = cli.output.unwrap_or_else(|| {
        writer::default_output_path(&generator_source(), &config.output.filename)
    });
    writer::write(&path, &source)?;
    tracing::info!(path = %path.display(), "version module generated");

    Ok(())
}

/// Absolute path of this file in the buildstamp package.
fn generator_source() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(file!())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let ansi = io::stderr().is_terminal() && env::var("BUILDSTAMP_LOG_NO_COLOR").is_err();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(io::stderr)
        .try_init();
}
