//! Error taxonomy of a sweep.
//!
//! Only range-level and contract errors travel as `Err`. Per-host failures are
//! data, see [`crate::network::outcome::ProbeError`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The network specification could not be turned into a [`crate::network::range::NetworkRange`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("invalid prefix length: {0} > 32")]
    InvalidPrefix(u8),

    #[error("invalid IPv4 address '{0}'")]
    InvalidAddress(String),

    #[error("invalid network '{input}': {reason}")]
    Malformed { input: String, reason: String },

    #[error("could not determine the local IPv4 address: {0}")]
    NoLocalAddress(String),
}

/// A finalized report was mutated. This is a programming error, not a runtime condition.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ReportError {
    #[error("scan report is already finalized")]
    Finalized,
}

/// The report artifact could not be written. The sweep result itself is unaffected.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to write report to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
