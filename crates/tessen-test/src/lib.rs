//! tessen vCard library - integration test support.
//!
//! Re-exports the workspace crates so integration tests can use `tessen::`
//! style paths, and loads codec options the way an application would.

use anyhow::Result;

use tessen_core::config::load_config;
use tessen_rfc::rfc::vcard::{ReadOptions, WriteOptions};

pub mod config {
    pub use tessen_core::config::*;
}

pub use tessen_core::constants;
pub use tessen_rfc as rfc;

/// ## Summary
/// Loads settings from the environment and converts them to codec options.
///
/// ## Errors
/// Returns an error if the configuration cannot be loaded or names an unknown
/// vCard version.
pub fn load_options() -> Result<(ReadOptions, WriteOptions)> {
    let settings = load_config()?;
    let read = ReadOptions::try_from(&settings.reader)?;
    let write = WriteOptions::try_from(&settings.writer)?;
    tracing::debug!(?read, ?write, "Loaded codec options");
    Ok((read, write))
}
