//! Shared types for ledger-wallet
//!
//! Common data structures used across the wallet facade and currency modules.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A currency supported (or at least recognized) by the wallet facade
///
/// Dispatch is a fixed registry keyed by this enum; codes that do not parse
/// are rejected at the facade boundary before any module is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// XRP Ledger native asset
    Xrp,
}

impl Currency {
    /// Ledger currency code as it appears on the wire
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Xrp => "XRP",
        }
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "XRP" => Ok(Currency::Xrp),
            _ => Err(s.to_string()),
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Parameters for a payment transfer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Funding account address
    pub sender_address: String,

    /// Secret used by the ledger client to sign the payment
    pub sender_secret: String,

    /// Destination account address
    pub receiver_address: String,

    /// Amount in whole currency units, as a decimal string (e.g. "0.01")
    pub amount: String,
}

impl TransferRequest {
    /// Parse and validate the requested amount
    ///
    /// The amount must be a well-formed decimal strictly greater than zero.
    /// Address format validation stays with the ledger client; only
    /// presence is checked locally.
    pub fn parsed_amount(&self) -> Result<Decimal, String> {
        let amount = Decimal::from_str(self.amount.trim())
            .map_err(|e| format!("'{}' is not a decimal amount: {}", self.amount, e))?;
        if amount <= Decimal::ZERO {
            return Err(format!("amount must be positive, got '{}'", self.amount));
        }
        Ok(amount)
    }
}

/// A freshly generated ledger account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedAddress {
    /// Public account address
    pub address: String,

    /// Secret seed controlling the account
    pub secret: String,
}

/// Account state as reported by the ledger
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AccountInfo {
    /// Spendable balance in whole currency units
    pub balance: f64,
}

/// Result of a transfer that reached a validated ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmedOutcome {
    /// Always "SUCCESS" for a confirmed transfer
    pub result: String,

    /// Transaction hash assigned at signing time
    pub id: String,

    /// Close time of the validated ledger that included the transaction
    pub timestamp: DateTime<Utc>,

    /// Fee actually charged, in whole currency units as a decimal string
    pub fee: String,
}
