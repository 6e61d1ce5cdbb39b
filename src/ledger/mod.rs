//! Ledger client layer
//!
//! Defines the asynchronous contract every ledger client adapter satisfies,
//! plus the concrete rippled JSON-RPC implementation. Signing, consensus,
//! and fee computation all live behind this boundary.

pub mod client;
pub mod rippled;

pub use client::{
    LedgerClient, LedgerError, PaymentAmount, PaymentParty, PaymentSpec, PreparedTransaction,
    SignedTransaction, SubmissionResult, TransactionOutcome, ValidationWindow, TEC_UNFUNDED_PAYMENT,
    TES_SUCCESS,
};
pub use rippled::JsonRpcLedgerClient;
