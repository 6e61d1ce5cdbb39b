//! Common test utilities for ledger-wallet integration tests
//!
//! Provides a scripted in-memory ledger client so the full wallet stack can
//! be exercised without a network: simulated account balances, controllable
//! submission results, and a programmable confirmation-poll sequence.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Mutex;

use ledger_wallet::ledger::{
    LedgerClient, LedgerError, PaymentSpec, PreparedTransaction, SignedTransaction,
    SubmissionResult, TransactionOutcome, ValidationWindow, TES_SUCCESS,
};
use ledger_wallet::types::{AccountInfo, GeneratedAddress};
use ledger_wallet::WalletConfig;

/// Fee the mock ledger charges every payment, in whole XRP
pub const MOCK_FEE: &str = "0.000012";

/// A payment the mock has accepted but not yet reported as validated
#[derive(Debug, Clone)]
struct InFlightPayment {
    id: String,
    fee: String,
}

/// Scripted ledger client for tests
///
/// Tracks per-operation call counters so tests can assert which operations
/// did (or did not) reach the "network".
pub struct MockLedgerClient {
    /// Simulated validated ledger version
    ledger_version: AtomicU32,

    /// Simulated account balances in whole XRP
    balances: Mutex<HashMap<String, Decimal>>,

    /// Payment captured at prepare/sign time, consumed by submit
    in_flight: Mutex<Option<(PaymentSpec, String)>>,

    /// Payment accepted by submit, reported by `transaction` once polls drain
    validated: Mutex<Option<InFlightPayment>>,

    /// Number of `PendingLedgerVersion` answers before the payment is found
    pending_polls: AtomicUsize,

    /// Always answer pending, regardless of `pending_polls`
    forever_pending: AtomicBool,

    /// One-shot error injected into the next `transaction` call
    poll_error: Mutex<Option<LedgerError>>,

    /// Engine result the validated transaction reports (tesSUCCESS default)
    validated_result: Mutex<Option<String>>,

    /// Forced submission result, overriding balance simulation
    forced_submit: Mutex<Option<(String, String)>>,

    /// Fail the next `connect` call
    fail_connect: AtomicBool,

    next_address: AtomicUsize,

    pub connect_calls: AtomicUsize,
    pub account_info_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
    pub transaction_calls: AtomicUsize,

    /// Every operation that would hit the network
    pub network_calls: AtomicUsize,
}

impl MockLedgerClient {
    pub fn new() -> Self {
        // RUST_LOG support for debugging test runs; first caller wins.
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            ledger_version: AtomicU32::new(100),
            balances: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(None),
            validated: Mutex::new(None),
            pending_polls: AtomicUsize::new(0),
            forever_pending: AtomicBool::new(false),
            poll_error: Mutex::new(None),
            validated_result: Mutex::new(None),
            forced_submit: Mutex::new(None),
            fail_connect: AtomicBool::new(false),
            next_address: AtomicUsize::new(1),
            connect_calls: AtomicUsize::new(0),
            account_info_calls: AtomicUsize::new(0),
            submit_calls: AtomicUsize::new(0),
            transaction_calls: AtomicUsize::new(0),
            network_calls: AtomicUsize::new(0),
        }
    }

    /// Seed an account with a balance in whole XRP
    pub fn fund(&self, address: &str, balance: &str) {
        self.balances
            .lock()
            .unwrap()
            .insert(address.to_string(), Decimal::from_str(balance).unwrap());
    }

    pub fn balance_of(&self, address: &str) -> Decimal {
        self.balances
            .lock()
            .unwrap()
            .get(address)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Answer pending this many times before reporting the payment found
    pub fn set_pending_polls(&self, count: usize) {
        self.pending_polls.store(count, Ordering::SeqCst);
    }

    pub fn set_forever_pending(&self) {
        self.forever_pending.store(true, Ordering::SeqCst);
    }

    /// Inject a one-shot error into the next confirmation query
    pub fn set_poll_error(&self, error: LedgerError) {
        *self.poll_error.lock().unwrap() = Some(error);
    }

    /// Report the validated transaction with this engine result instead of
    /// tesSUCCESS (e.g. a tec code: fee claimed, payment not delivered)
    pub fn set_validated_result(&self, code: &str) {
        *self.validated_result.lock().unwrap() = Some(code.to_string());
    }

    /// Force the next submission to return this engine result
    pub fn set_submit_result(&self, code: &str, message: &str) {
        *self.forced_submit.lock().unwrap() = Some((code.to_string(), message.to_string()));
    }

    pub fn set_fail_connect(&self) {
        self.fail_connect.store(true, Ordering::SeqCst);
    }

    fn touch_network(&self) {
        self.network_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn fee() -> Decimal {
        Decimal::from_str(MOCK_FEE).unwrap()
    }

    /// Apply a submitted payment to the simulated balances
    ///
    /// Returns the unfunded engine result without touching balances when
    /// the sender cannot cover amount plus fee.
    fn settle(&self, payment: &PaymentSpec) -> (String, String) {
        let amount = Decimal::from_str(&payment.destination.amount.value).unwrap();
        let mut balances = self.balances.lock().unwrap();

        let sender = balances
            .get(&payment.source.address)
            .copied()
            .unwrap_or(Decimal::ZERO);
        if sender < amount + Self::fee() {
            return (
                "tecUNFUNDED_PAYMENT".to_string(),
                "Insufficient XRP balance to send.".to_string(),
            );
        }

        balances.insert(payment.source.address.clone(), sender - amount - Self::fee());
        let receiver = balances
            .get(&payment.destination.address)
            .copied()
            .unwrap_or(Decimal::ZERO);
        balances.insert(payment.destination.address.clone(), receiver + amount);

        (TES_SUCCESS.to_string(), "The transaction was applied.".to_string())
    }
}

#[async_trait]
impl LedgerClient for MockLedgerClient {
    async fn connect(&self) -> Result<(), LedgerError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        self.touch_network();
        if self.fail_connect.swap(false, Ordering::SeqCst) {
            return Err(LedgerError::NotConnected);
        }
        Ok(())
    }

    async fn generate_address(&self) -> Result<GeneratedAddress, LedgerError> {
        // Key generation is local; deliberately not counted as network.
        let n = self.next_address.fetch_add(1, Ordering::SeqCst);
        Ok(GeneratedAddress {
            address: format!("rMockAddress{}", n),
            secret: format!("sMockSecret{}", n),
        })
    }

    async fn account_info(&self, address: &str) -> Result<AccountInfo, LedgerError> {
        self.account_info_calls.fetch_add(1, Ordering::SeqCst);
        self.touch_network();
        let balance = self
            .balances
            .lock()
            .unwrap()
            .get(address)
            .copied()
            .ok_or(LedgerError::Api {
                error: "actNotFound".to_string(),
                code: 19,
            })?;
        Ok(AccountInfo {
            balance: balance.to_f64().unwrap(),
        })
    }

    async fn prepare_payment(
        &self,
        address: &str,
        payment: &PaymentSpec,
        max_ledger_version_offset: u32,
    ) -> Result<PreparedTransaction, LedgerError> {
        self.touch_network();
        let max_ledger_version =
            self.ledger_version.load(Ordering::SeqCst) + max_ledger_version_offset;
        let id = format!("MOCKTX{:08X}", self.submit_calls.load(Ordering::SeqCst));
        *self.in_flight.lock().unwrap() = Some((payment.clone(), id));

        Ok(PreparedTransaction {
            tx_json: serde_json::json!({
                "TransactionType": "Payment",
                "Account": address,
                "LastLedgerSequence": max_ledger_version,
            }),
            max_ledger_version,
        })
    }

    async fn ledger_version(&self) -> Result<u32, LedgerError> {
        self.touch_network();
        Ok(self.ledger_version.load(Ordering::SeqCst))
    }

    async fn sign(
        &self,
        _tx_json: &serde_json::Value,
        _secret: &str,
    ) -> Result<SignedTransaction, LedgerError> {
        self.touch_network();
        let id = self
            .in_flight
            .lock()
            .unwrap()
            .as_ref()
            .map(|(_, id)| id.clone())
            .ok_or(LedgerError::MalformedResponse(
                "sign before prepare".to_string(),
            ))?;
        Ok(SignedTransaction {
            tx_blob: format!("BLOB-{}", id),
            id,
        })
    }

    async fn submit(&self, _tx_blob: &str) -> Result<SubmissionResult, LedgerError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.touch_network();

        let (payment, id) = self
            .in_flight
            .lock()
            .unwrap()
            .take()
            .ok_or(LedgerError::MalformedResponse(
                "submit before prepare".to_string(),
            ))?;

        let (result_code, result_message) = match self.forced_submit.lock().unwrap().take() {
            Some(forced) => forced,
            None => self.settle(&payment),
        };

        if result_code == TES_SUCCESS {
            *self.validated.lock().unwrap() = Some(InFlightPayment {
                id,
                fee: MOCK_FEE.to_string(),
            });
        }

        Ok(SubmissionResult {
            result_code,
            result_message,
        })
    }

    async fn transaction(
        &self,
        id: &str,
        _window: ValidationWindow,
    ) -> Result<TransactionOutcome, LedgerError> {
        self.transaction_calls.fetch_add(1, Ordering::SeqCst);
        self.touch_network();

        if let Some(error) = self.poll_error.lock().unwrap().take() {
            return Err(error);
        }
        if self.forever_pending.load(Ordering::SeqCst) {
            return Err(LedgerError::PendingLedgerVersion);
        }
        if self
            .pending_polls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(LedgerError::PendingLedgerVersion);
        }

        let result_code = self
            .validated_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| TES_SUCCESS.to_string());
        let validated = self.validated.lock().unwrap();
        match validated.as_ref() {
            Some(payment) if payment.id == id => Ok(TransactionOutcome {
                id: payment.id.clone(),
                result_code,
                ledger_version: self.ledger_version.fetch_add(1, Ordering::SeqCst),
                timestamp: Utc::now(),
                fee: payment.fee.clone(),
            }),
            _ => Err(LedgerError::TransactionNotFound),
        }
    }
}

/// Wallet configuration tuned for fast, deterministic polling in tests
pub fn test_config() -> WalletConfig {
    WalletConfig {
        polling_interval_ms: 100,
        ..WalletConfig::default_testnet()
    }
}
