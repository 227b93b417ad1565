use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn one statement file into an Entry. These are per-file:
/// a batch keeps going with its other files.
#[derive(Error, Debug)]
pub enum StatementError {
    /// The file isn't laid out like any version of the institution's export
    /// we know (title marker, header row, column count).
    #[error("{}: unsupported statement format: {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// The layout was recognized, but something required (account number,
    /// any currency balance) could not be found or read.
    #[error("{}: malformed statement: {reason}", path.display())]
    MalformedStatement { path: PathBuf, reason: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StatementError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            StatementError::UnsupportedFormat { path, .. }
            | StatementError::MalformedStatement { path, .. }
            | StatementError::Io { path, .. } => path,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no analyzer registered for \"{0}\"")]
    UnknownAnalyzer(String),

    #[error("cannot register {analyzer} under \"{key}\", it analyzes {analyzes} statements")]
    InstitutionMismatch {
        key: String,
        analyzer: &'static str,
        analyzes: String,
    },

    #[error("\"{key}\" is already registered to {existing}, cannot register {attempted}")]
    DuplicateRegistration {
        key: String,
        existing: &'static str,
        attempted: &'static str,
    },
}

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("invalid file name format \"{format}\": {reason}")]
    InvalidFormat { format: String, reason: String },

    #[error("rendered file name pattern \"{pattern}\" is not a valid glob: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("unable to list {}: {source}", dir.display())]
    Io {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Anything that can go wrong while loading a batch, before per-file parse
/// errors come into play.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}
