use std::{io, path::PathBuf};
use thiserror::Error;

/// A compressed instance could not be turned into a plain CNF file.
#[derive(Debug, Error)]
pub enum DecompressError {
    #[error("failed to read compressed instance {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write scratch file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// The solver executable could not be started at all.
#[derive(Debug, Error)]
#[error("failed to launch {}: {source}", program.display())]
pub struct LaunchError {
    pub program: PathBuf,
    pub source: io::Error,
}
