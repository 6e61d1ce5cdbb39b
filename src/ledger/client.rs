//! Ledger client adapter contract
//!
//! The wallet treats the ledger client as a black box with an asynchronous
//! request/response contract and a small set of named error conditions.
//! Currency modules drive it through this trait; tests substitute a mock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AccountInfo, GeneratedAddress};

/// Engine result for a provisionally accepted transaction
pub const TES_SUCCESS: &str = "tesSUCCESS";

/// Engine result for a payment the sender cannot fund
pub const TEC_UNFUNDED_PAYMENT: &str = "tecUNFUNDED_PAYMENT";

/// Errors raised by a ledger client adapter
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("ledger API error: {error} (code {code})")]
    Api { error: String, code: u32 },

    /// The transaction has not yet appeared in any validated ledger within
    /// the queried range; retryable
    #[error("transaction not yet in a validated ledger")]
    PendingLedgerVersion,

    /// The queried range is exhausted and the transaction is not in it
    #[error("transaction not found")]
    TransactionNotFound,

    /// The endpoint refuses server-side signing (admin-only method)
    #[error(
        "signing is disabled on this endpoint; transfers need a trusted \
         rippled node with the sign method enabled"
    )]
    SigningUnavailable,

    #[error("malformed ledger response: {0}")]
    MalformedResponse(String),

    #[error("not connected to the ledger")]
    NotConnected,
}

/// An amount with its currency code, value as a decimal string
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentAmount {
    pub value: String,
    pub currency: String,
}

/// One side of a payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentParty {
    pub address: String,
    pub amount: PaymentAmount,
}

/// A payment instruction: source with a maximum-spend bound, destination
/// with the exact amount to deliver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSpec {
    pub source: PaymentParty,
    pub destination: PaymentParty,
}

/// A prepared, unsigned transaction
#[derive(Debug, Clone)]
pub struct PreparedTransaction {
    /// Transaction JSON ready for signing
    pub tx_json: serde_json::Value,

    /// Last ledger version the transaction is eligible for inclusion in
    pub max_ledger_version: u32,
}

/// Output of signing a prepared transaction
#[derive(Debug, Clone)]
pub struct SignedTransaction {
    /// Serialized signed blob ready for submission
    pub tx_blob: String,

    /// Transaction hash, known as soon as the transaction is signed
    pub id: String,
}

/// Immediate result of submitting a signed blob
///
/// A success code here only means the transaction is being considered for
/// the next ledger; inclusion still requires validation.
#[derive(Debug, Clone)]
pub struct SubmissionResult {
    pub result_code: String,
    pub result_message: String,
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        self.result_code == TES_SUCCESS
    }
}

/// Ledger-version bounds for a confirmation query
#[derive(Debug, Clone, Copy)]
pub struct ValidationWindow {
    pub min_ledger_version: u32,
    pub max_ledger_version: u32,
}

impl ValidationWindow {
    /// Number of ledger closes the window spans
    pub fn span(&self) -> u32 {
        self.max_ledger_version
            .saturating_sub(self.min_ledger_version)
            .saturating_add(1)
    }
}

/// A transaction as retrieved from a validated ledger
#[derive(Debug, Clone)]
pub struct TransactionOutcome {
    pub id: String,
    pub result_code: String,

    /// Ledger version the transaction was validated in
    pub ledger_version: u32,

    /// Close time of the including ledger
    pub timestamp: DateTime<Utc>,

    /// Fee charged, in whole currency units as a decimal string
    pub fee: String,
}

/// Asynchronous ledger client contract
///
/// One implementation speaks rippled JSON-RPC; tests provide a scripted
/// mock. All operations except `generate_address` assume a live session
/// (see `LedgerSession`).
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Establish (or probe) the session with the ledger node
    async fn connect(&self) -> Result<(), LedgerError>;

    /// Generate a new account address and secret; requires no session
    async fn generate_address(&self) -> Result<GeneratedAddress, LedgerError>;

    /// Query account state; balance reported in whole currency units
    async fn account_info(&self, address: &str) -> Result<AccountInfo, LedgerError>;

    /// Prepare an unsigned payment transaction for `address`, valid for
    /// `max_ledger_version_offset` further ledger closes
    async fn prepare_payment(
        &self,
        address: &str,
        payment: &PaymentSpec,
        max_ledger_version_offset: u32,
    ) -> Result<PreparedTransaction, LedgerError>;

    /// Current validated ledger version
    async fn ledger_version(&self) -> Result<u32, LedgerError>;

    /// Sign a prepared transaction with the sender secret
    async fn sign(
        &self,
        tx_json: &serde_json::Value,
        secret: &str,
    ) -> Result<SignedTransaction, LedgerError>;

    /// Submit a signed blob; the result is provisional
    async fn submit(&self, tx_blob: &str) -> Result<SubmissionResult, LedgerError>;

    /// Retrieve a transaction from the validated ledger range
    ///
    /// Fails with `PendingLedgerVersion` while the transaction has not yet
    /// appeared and the window is still open.
    async fn transaction(
        &self,
        id: &str,
        window: ValidationWindow,
    ) -> Result<TransactionOutcome, LedgerError>;
}
