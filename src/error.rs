use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    Usage(String),
    #[error("cannot {op} {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        op: &'static str,
        #[source]
        source: io::Error,
    },
    /// Region boundaries do not tile the buffer on line starts.
    #[error("bad region layout at byte {offset}: {reason}")]
    Layout { offset: usize, reason: &'static str },
    #[error("malformed record at byte {offset}: {reason}")]
    Parse { offset: usize, reason: &'static str },
    #[error("cannot start worker thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("worker {0} panicked")]
    Worker(usize),
}
