use eco_types::LedgerError;
use thiserror::Error;

/// Errors from the local key-value cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Errors from a [`LedgerBackend`](crate::LedgerBackend).
///
/// A plant refused for lack of points is not an error here; it is reported
/// as [`PlantOutcome::Rejected`](crate::PlantOutcome::Rejected). Any other
/// business rejection is [`BackendError::Rejected`] and is final.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The store could not be contacted (connect failure, timeout).
    #[error("ledger store unreachable: {0}")]
    Unreachable(String),

    /// The store answered with a non-success status that is not a business
    /// rejection.
    #[error("ledger store returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The store answered with a body that does not match the contract.
    #[error("undecodable response: {0}")]
    Decode(String),

    /// The ledger refused the operation.
    #[error("rejected: {0}")]
    Rejected(LedgerError),

    /// The local cache could not be written.
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

pub type BackendResult<T> = Result<T, BackendError>;

impl BackendError {
    /// Whether the ledger answered with a business rejection, as opposed to
    /// not being consulted at all.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("{0}")]
    Rejected(#[from] LedgerError),

    #[error("local ledger error: {0}")]
    Local(BackendError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl From<BackendError> for ClientError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::Rejected(rejection) => Self::Rejected(rejection),
            BackendError::Cache(cache) => Self::Cache(cache),
            other => Self::Local(other),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
