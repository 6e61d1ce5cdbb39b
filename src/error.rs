//! Wallet-level error taxonomy
//!
//! Classified failures surfaced by the facade and currency modules. Ledger
//! client errors that carry no wallet-level meaning pass through verbatim
//! via the `Ledger` variant.

use crate::ledger::LedgerError;

/// Errors returned by wallet operations
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// Address argument missing or empty; detected before any network call
    #[error("invalid account: address is missing or empty")]
    InvalidAccount,

    /// Requested amount is not a positive decimal
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Submission was rejected because the sender cannot fund the payment
    #[error("insufficient balance: {0}")]
    InsufficientBalance(String),

    /// Submission was rejected with a non-success engine result
    #[error("transaction failed with {code}: {message}")]
    Transaction { code: String, message: String },

    /// Currency code has no registered module
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// Polling exhausted its validation window without a definitive answer
    #[error("transaction not validated after {attempts} polling attempts")]
    ConfirmationTimeout { attempts: u32 },

    /// The confirmation query itself failed with a non-retryable error
    #[error("confirmation query failed")]
    ConfirmationFailed(#[source] LedgerError),

    /// Unclassified ledger client error, propagated as-is
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
