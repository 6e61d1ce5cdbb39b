//! rippled JSON-RPC ledger client
//!
//! Concrete `LedgerClient` speaking the rippled HTTP API. Transaction
//! signing and fee computation are delegated to the server's `sign` method;
//! nothing cryptographic happens in this crate.
//!
//! The `sign` method is admin-only: public clusters (including the default
//! endpoints) answer queries and accept submissions but refuse signing with
//! `noPermission`. Transfers therefore need `WalletConfig::endpoint` pointed
//! at a trusted rippled node with admin access; that refusal surfaces as
//! `LedgerError::SigningUnavailable` instead of a generic API error.

use log::debug;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use std::time::Duration;

use crate::config::WalletConfig;
use crate::ledger::client::{
    LedgerClient, LedgerError, PaymentSpec, PreparedTransaction, SignedTransaction,
    SubmissionResult, TransactionOutcome, ValidationWindow,
};
use crate::types::{AccountInfo, GeneratedAddress};

/// Drops per whole XRP
const DROPS_PER_XRP: u64 = 1_000_000;

/// Seconds between the Unix epoch and the ripple epoch (2000-01-01T00:00:00Z)
const RIPPLE_EPOCH_OFFSET: i64 = 946_684_800;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Ledger client over the rippled JSON-RPC HTTP API
pub struct JsonRpcLedgerClient {
    endpoint: String,
    http: reqwest::Client,
}

impl JsonRpcLedgerClient {
    /// Create a client for the endpoint selected by `config`
    pub fn new(config: &WalletConfig) -> Result<Self, LedgerError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            endpoint: config.endpoint().to_string(),
            http,
        })
    }

    /// Issue one JSON-RPC request and unwrap the `result` object
    ///
    /// rippled reports request-level failures inside `result` with
    /// `status: "error"`; those surface as `LedgerError::Api` unless the
    /// caller handles the error name itself (see `transaction`).
    async fn request(&self, method: &str, params: Value) -> Result<Value, LedgerError> {
        debug!("rippled request: {}", method);
        let body = json!({
            "method": method,
            "params": [params],
        });

        let response = self.http.post(&self.endpoint).json(&body).send().await?;
        let payload: Value = response.json().await?;

        let result = payload
            .get("result")
            .cloned()
            .ok_or_else(|| LedgerError::MalformedResponse("missing result object".to_string()))?;

        Ok(result)
    }

    /// Same as `request`, but converts a `status: "error"` result into an API error
    async fn request_ok(&self, method: &str, params: Value) -> Result<Value, LedgerError> {
        let result = self.request(method, params).await?;
        if result["status"] == "error" {
            return Err(api_error(&result));
        }
        Ok(result)
    }

    async fn account_sequence(&self, address: &str) -> Result<u32, LedgerError> {
        let result = self
            .request_ok(
                "account_info",
                json!({"account": address, "ledger_index": "current"}),
            )
            .await?;

        result["account_data"]["Sequence"]
            .as_u64()
            .map(|s| s as u32)
            .ok_or_else(|| LedgerError::MalformedResponse("missing account sequence".to_string()))
    }
}

#[async_trait::async_trait]
impl LedgerClient for JsonRpcLedgerClient {
    async fn connect(&self) -> Result<(), LedgerError> {
        // JSON-RPC is connectionless; probe the node so unreachable or
        // unsynced endpoints fail at connect time rather than mid-transfer.
        let result = self.request_ok("server_info", json!({})).await?;
        if result.get("info").is_none() {
            return Err(LedgerError::MalformedResponse(
                "server_info returned no info".to_string(),
            ));
        }
        debug!("connected to {}", self.endpoint);
        Ok(())
    }

    async fn generate_address(&self) -> Result<GeneratedAddress, LedgerError> {
        let result = self.request_ok("wallet_propose", json!({})).await?;

        let address = result["account_id"]
            .as_str()
            .ok_or_else(|| LedgerError::MalformedResponse("missing account_id".to_string()))?;
        let secret = result["master_seed"]
            .as_str()
            .ok_or_else(|| LedgerError::MalformedResponse("missing master_seed".to_string()))?;

        Ok(GeneratedAddress {
            address: address.to_string(),
            secret: secret.to_string(),
        })
    }

    async fn account_info(&self, address: &str) -> Result<AccountInfo, LedgerError> {
        let result = self
            .request_ok(
                "account_info",
                json!({"account": address, "ledger_index": "validated"}),
            )
            .await?;

        let drops = result["account_data"]["Balance"]
            .as_str()
            .ok_or_else(|| LedgerError::MalformedResponse("missing account balance".to_string()))?;

        Ok(AccountInfo {
            balance: drops_to_xrp(drops)?,
        })
    }

    async fn prepare_payment(
        &self,
        address: &str,
        payment: &PaymentSpec,
        max_ledger_version_offset: u32,
    ) -> Result<PreparedTransaction, LedgerError> {
        let sequence = self.account_sequence(address).await?;
        let current_version = self.ledger_version().await?;
        let max_ledger_version = current_version + max_ledger_version_offset;

        Ok(PreparedTransaction {
            tx_json: payment_tx_json(payment, sequence, max_ledger_version)?,
            max_ledger_version,
        })
    }

    async fn ledger_version(&self) -> Result<u32, LedgerError> {
        let result = self
            .request_ok("ledger", json!({"ledger_index": "validated"}))
            .await?;

        result["ledger_index"]
            .as_u64()
            .map(|v| v as u32)
            .ok_or_else(|| LedgerError::MalformedResponse("missing ledger_index".to_string()))
    }

    async fn sign(
        &self,
        tx_json: &Value,
        secret: &str,
    ) -> Result<SignedTransaction, LedgerError> {
        let result = self
            .request_ok("sign", json!({"tx_json": tx_json, "secret": secret}))
            .await
            .map_err(classify_sign_error)?;

        let tx_blob = result["tx_blob"]
            .as_str()
            .ok_or_else(|| LedgerError::MalformedResponse("missing tx_blob".to_string()))?;
        let id = result["tx_json"]["hash"]
            .as_str()
            .ok_or_else(|| LedgerError::MalformedResponse("missing transaction hash".to_string()))?;

        Ok(SignedTransaction {
            tx_blob: tx_blob.to_string(),
            id: id.to_string(),
        })
    }

    async fn submit(&self, tx_blob: &str) -> Result<SubmissionResult, LedgerError> {
        let result = self
            .request_ok("submit", json!({"tx_blob": tx_blob}))
            .await?;

        let result_code = result["engine_result"]
            .as_str()
            .ok_or_else(|| LedgerError::MalformedResponse("missing engine_result".to_string()))?;
        let result_message = result["engine_result_message"].as_str().unwrap_or_default();

        Ok(SubmissionResult {
            result_code: result_code.to_string(),
            result_message: result_message.to_string(),
        })
    }

    async fn transaction(
        &self,
        id: &str,
        window: ValidationWindow,
    ) -> Result<TransactionOutcome, LedgerError> {
        let result = self
            .request(
                "tx",
                json!({
                    "transaction": id,
                    "min_ledger": window.min_ledger_version,
                    "max_ledger": window.max_ledger_version,
                    "binary": false,
                }),
            )
            .await?;

        if result["status"] == "error" {
            // txnNotFound with an incompletely searched range means the
            // transaction may still land in a later validated ledger.
            if result["error"] == "txnNotFound" {
                if result["searched_all"] == true {
                    return Err(LedgerError::TransactionNotFound);
                }
                return Err(LedgerError::PendingLedgerVersion);
            }
            return Err(api_error(&result));
        }

        // Found but not yet validated counts as pending too.
        if result["validated"] != true {
            return Err(LedgerError::PendingLedgerVersion);
        }

        let result_code = result["meta"]["TransactionResult"]
            .as_str()
            .ok_or_else(|| {
                LedgerError::MalformedResponse("missing meta.TransactionResult".to_string())
            })?;
        let ledger_version = result["ledger_index"].as_u64().ok_or_else(|| {
            LedgerError::MalformedResponse("missing ledger_index on transaction".to_string())
        })?;
        let close_time = result["date"].as_i64().ok_or_else(|| {
            LedgerError::MalformedResponse("missing close date on transaction".to_string())
        })?;
        let fee_drops = result["Fee"].as_str().ok_or_else(|| {
            LedgerError::MalformedResponse("missing fee on transaction".to_string())
        })?;

        let timestamp = chrono::DateTime::from_timestamp(close_time + RIPPLE_EPOCH_OFFSET, 0)
            .ok_or_else(|| {
                LedgerError::MalformedResponse(format!("close date {} out of range", close_time))
            })?;

        Ok(TransactionOutcome {
            id: id.to_string(),
            result_code: result_code.to_string(),
            ledger_version: ledger_version as u32,
            timestamp,
            fee: drops_to_fee_string(fee_drops)?,
        })
    }
}

/// Build the unsigned Payment transaction JSON
///
/// Direct XRP-to-XRP payments must not carry `SendMax`; rippled rejects a
/// redundant bound with `temREDUNDANT_SEND_MAX`. The source max-spend bound
/// in `PaymentSpec` only reaches the wire for adapters whose format uses
/// it. Fee is left for the server to fill in during sign; fee policy
/// belongs to the ledger client, not the wallet.
fn payment_tx_json(
    payment: &PaymentSpec,
    sequence: u32,
    max_ledger_version: u32,
) -> Result<Value, LedgerError> {
    Ok(json!({
        "TransactionType": "Payment",
        "Account": payment.source.address,
        "Destination": payment.destination.address,
        "Amount": xrp_to_drops(&payment.destination.amount.value)?,
        "Sequence": sequence,
        "LastLedgerSequence": max_ledger_version,
    }))
}

fn api_error(result: &Value) -> LedgerError {
    LedgerError::Api {
        error: result["error"].as_str().unwrap_or("unknown").to_string(),
        code: result["error_code"].as_u64().unwrap_or(0) as u32,
    }
}

/// Distinguish an endpoint that refuses to sign from other API failures
fn classify_sign_error(error: LedgerError) -> LedgerError {
    match error {
        LedgerError::Api { ref error, .. } if error == "noPermission" => {
            LedgerError::SigningUnavailable
        }
        other => other,
    }
}

/// Convert a drops string to whole XRP
fn drops_to_xrp(drops: &str) -> Result<f64, LedgerError> {
    let drops: u64 = drops
        .parse()
        .map_err(|_| LedgerError::MalformedResponse(format!("bad drops value '{}'", drops)))?;
    Ok(drops as f64 / DROPS_PER_XRP as f64)
}

/// Convert a drops string to a whole-XRP decimal string, exactly
fn drops_to_fee_string(drops: &str) -> Result<String, LedgerError> {
    let drops = Decimal::from_str(drops)
        .map_err(|_| LedgerError::MalformedResponse(format!("bad drops value '{}'", drops)))?;
    Ok((drops / Decimal::from(DROPS_PER_XRP)).normalize().to_string())
}

/// Convert a whole-XRP decimal string to integer drops
fn xrp_to_drops(value: &str) -> Result<String, LedgerError> {
    let xrp = Decimal::from_str(value)
        .map_err(|_| LedgerError::MalformedResponse(format!("bad amount '{}'", value)))?;
    let drops = (xrp * Decimal::from(DROPS_PER_XRP)).normalize();
    if drops.fract() != Decimal::ZERO {
        return Err(LedgerError::MalformedResponse(format!(
            "amount '{}' is below drop precision",
            value
        )));
    }
    Ok(drops.trunc().to_string())
}
