//! Error types for fls
//!
//! Invocation and fatal-path errors stop a run. Traversal errors are
//! reported to stderr by the walker and never bubble out of a listing.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlsError {
    /// Missing or malformed command-line arguments
    #[error("{0}")]
    Usage(String),

    #[error("unknown format token '%{token}'")]
    UnknownFormatToken { token: char },

    #[error("format template ends with a lone '%'")]
    DanglingPercent,

    #[error("unknown sort key '{0}'")]
    UnknownSortKey(String),

    #[error("--sort needs at least one key")]
    EmptySortSpec,

    #[error("invalid exclude pattern '{pattern}': {source}")]
    InvalidExclude {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// The listing target is neither a regular file nor a directory
    #[error("cannot list '{}': not a regular file or directory", .0.display())]
    NotListable(PathBuf),

    /// A subtree or entry could not be read
    #[error("cannot read '{}': {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error writing output: {0}")]
    Output(#[from] io::Error),

    #[error("printer thread panicked")]
    PrinterPanicked,

    #[error("pipeline already marked done")]
    PipelineClosed,
}

impl FlsError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            FlsError::Output(e) if e.kind() == io::ErrorKind::BrokenPipe => 0,
            _ => 1,
        }
    }

    /// True when the error should be printed before exiting.
    pub fn is_reportable(&self) -> bool {
        self.exit_code() != 0
    }
}

pub type Result<T> = std::result::Result<T, FlsError>;
