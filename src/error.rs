//! Error types for the NL5 client.
//!
//! Every negative status returned by the engine is turned into one of these
//! variants at the call site that saw it. Nothing is retried.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the client.
#[derive(Debug, Error)]
pub enum Error {
    /// A per-document operation was called with no circuit open.
    #[error("{operation}: circuit file not opened or not valid, call open() first")]
    NotOpen { operation: &'static str },

    /// The engine refused to open a circuit file.
    #[error("open error: {0}")]
    Open(String),

    /// Parameter name does not resolve to a parameter handle.
    #[error("parameter {name} does not exist in circuit")]
    Param { name: String },

    /// Trace, input or output name does not resolve, or a trace could not be added.
    #[error("trace error: {0}")]
    Trace(String),

    /// Generic get/set failure, including out-of-range indices.
    #[error("value error: {0}")]
    Value(String),

    #[error("save error: {0}")]
    Save(String),

    /// Start, transient or AC simulation failed.
    #[error("simulation error: {0}")]
    Simulate(String),

    #[error("delete error: {0}")]
    Delete(String),

    /// License file rejected by the engine.
    #[error("license error: {0}")]
    License(String),

    /// Operation is deliberately not supported by the client.
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),

    /// Native library could not be loaded or is missing an entry point.
    #[error("library error: {0}")]
    Library(String),

    /// A name or text argument contains an interior NUL byte.
    #[error("invalid name {0:?}: contains a NUL byte")]
    InvalidName(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse error category, for callers that only care about the family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Open,
    Param,
    Trace,
    Value,
    Save,
    Simulate,
    Delete,
    License,
    NotImplemented,
    Library,
    Usage,
    Config,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotOpen { .. } | Error::Open(_) => ErrorKind::Open,
            Error::Param { .. } => ErrorKind::Param,
            Error::Trace(_) => ErrorKind::Trace,
            Error::Value(_) => ErrorKind::Value,
            Error::Save(_) => ErrorKind::Save,
            Error::Simulate(_) => ErrorKind::Simulate,
            Error::Delete(_) => ErrorKind::Delete,
            Error::License(_) => ErrorKind::License,
            Error::NotImplemented(_) => ErrorKind::NotImplemented,
            Error::Library(_) => ErrorKind::Library,
            Error::InvalidName(_) => ErrorKind::Usage,
            Error::Config(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<libloading::Error> for Error {
    fn from(e: libloading::Error) -> Self {
        Error::Library(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
