//! Build-time generator that stamps build identity into a Rust module.
//!
//! The pipeline is linear: [`collector::collect`] gathers
//! [`BuildProperties`] from `git describe` and the environment,
//! [`render::render`] turns them into formatted source, and
//! [`writer::write`] persists the result.

pub mod collector;
pub mod config;
pub mod properties;
pub mod render;
pub mod version_gen;
pub mod writer;

pub use collector::CollectError;
pub use config::{Config, ConfigError, Workspace};
pub use properties::BuildProperties;
pub use render::RenderError;
pub use writer::WriteError;
