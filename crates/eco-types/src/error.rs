use thiserror::Error;

use crate::points::Points;

/// Business-rule rejections produced by ledger arithmetic.
///
/// These are expected, user-facing outcomes rather than system faults. They
/// always carry the balance observed at the time of the rejection so callers
/// can display it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("not enough points: balance {balance}, need {required}")]
    InsufficientFunds { balance: Points, required: Points },

    #[error("points overflow: balance {balance}, delta {delta}")]
    Overflow { balance: Points, delta: Points },
}

impl LedgerError {
    /// The balance reported alongside the rejection.
    pub fn balance(&self) -> Points {
        match self {
            Self::InsufficientFunds { balance, .. } | Self::Overflow { balance, .. } => *balance,
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
