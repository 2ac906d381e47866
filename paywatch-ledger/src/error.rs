//! Error taxonomy for the ledger-client boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The server could not be reached or the transport failed mid-request.
    /// Fatal: no report can be produced.
    #[error("cannot reach ledger server: {0}")]
    Connection(#[from] reqwest::Error),

    /// The server rejected our credentials.
    #[error("ledger server rejected authentication")]
    Auth,

    /// The server answered with a non-success status.
    #[error("ledger server error: {status} {body}")]
    Api { status: u16, body: String },

    /// The configured budget file does not exist on the server.
    #[error("budget file not found on server: {0}")]
    UnknownBudget(String),

    /// A response did not have the shape we expect from the server.
    #[error("unexpected ledger response shape: {0}")]
    Shape(String),

    /// A single record is missing an expected field. Never fatal: the
    /// record is skipped and matching continues.
    #[error("malformed {kind} record: {reason}")]
    Malformed {
        kind: &'static str,
        reason: String,
    },

    #[error("{0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
