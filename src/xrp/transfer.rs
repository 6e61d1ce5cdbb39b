//! XRP transfer orchestration
//!
//! The submit-and-confirm lifecycle: build a payment instruction, prepare
//! and sign it through the ledger client, submit, then poll until the
//! transaction lands in a validated ledger or a terminal condition is hit.
//! Polling is bounded by the transaction's own validation window, so a
//! transfer can never wait past the point where inclusion is impossible.

use log::{debug, info};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::ledger::{
    LedgerError, PaymentAmount, PaymentParty, PaymentSpec, TransactionOutcome, ValidationWindow,
    TEC_UNFUNDED_PAYMENT, TES_SUCCESS,
};
use crate::session::LedgerSession;
use crate::types::{ConfirmedOutcome, Currency, TransferRequest};

/// Typical wall-clock time for one ledger close
const EXPECTED_LEDGER_CLOSE_MS: u64 = 4000;

/// Execute a payment and wait for it to reach a validated ledger
pub async fn transfer(
    session: &LedgerSession,
    config: &WalletConfig,
    request: &TransferRequest,
) -> Result<ConfirmedOutcome, WalletError> {
    request
        .parsed_amount()
        .map_err(WalletError::InvalidAmount)?;
    if request.sender_address.trim().is_empty() || request.receiver_address.trim().is_empty() {
        return Err(WalletError::InvalidAccount);
    }

    let payment = build_payment_spec(request);

    session.ensure_connected().await?;
    let client = session.client();

    // Prepare bounds validity to a fixed number of future ledger closes;
    // adapter validation errors (e.g. malformed address) propagate as-is.
    let prepared = client
        .prepare_payment(
            &request.sender_address,
            &payment,
            config.max_ledger_version_offset,
        )
        .await?;

    // The validated ledger version observed before submission is the lower
    // bound of the confirmation search.
    let min_ledger_version = client.ledger_version().await?;

    let signed = client
        .sign(&prepared.tx_json, &request.sender_secret)
        .await?;
    debug!("signed payment {}", signed.id);

    let submission = client.submit(&signed.tx_blob).await?;
    if !submission.is_success() {
        if submission.result_code == TEC_UNFUNDED_PAYMENT {
            return Err(WalletError::InsufficientBalance(submission.result_message));
        }
        return Err(WalletError::Transaction {
            code: submission.result_code,
            message: submission.result_message,
        });
    }

    // tesSUCCESS only means the transaction is being considered for the
    // next ledger; validation still has to be observed.
    let window = ValidationWindow {
        min_ledger_version,
        max_ledger_version: prepared.max_ledger_version,
    };
    let outcome = poll_for_validation(session, config, &signed.id, window).await?;

    // A transaction can reach a validated ledger with a tec result: the fee
    // is claimed but the payment itself failed. That is not a success.
    if outcome.result_code != TES_SUCCESS {
        return Err(WalletError::Transaction {
            code: outcome.result_code,
            message: format!(
                "payment failed in validated ledger {}",
                outcome.ledger_version
            ),
        });
    }
    info!(
        "payment {} validated in ledger {}",
        outcome.id, outcome.ledger_version
    );

    Ok(ConfirmedOutcome {
        result: "SUCCESS".to_string(),
        id: outcome.id,
        timestamp: outcome.timestamp,
        fee: outcome.fee,
    })
}

/// Shape a transfer request into a payment instruction
///
/// Source carries a maximum-spend bound equal to the amount; destination
/// gets the exact amount. Currency is fixed to the ledger's native asset.
fn build_payment_spec(request: &TransferRequest) -> PaymentSpec {
    let amount = PaymentAmount {
        value: request.amount.trim().to_string(),
        currency: Currency::Xrp.code().to_string(),
    };
    PaymentSpec {
        source: PaymentParty {
            address: request.sender_address.clone(),
            amount: amount.clone(),
        },
        destination: PaymentParty {
            address: request.receiver_address.clone(),
            amount,
        },
    }
}

/// Poll the ledger until the transaction is validated or the window closes
///
/// Each attempt waits the configured interval first, matching the cadence
/// of ledger closes. A pending answer retries; any other query failure is a
/// terminal `ConfirmationFailed`, never a silent success.
async fn poll_for_validation(
    session: &LedgerSession,
    config: &WalletConfig,
    id: &str,
    window: ValidationWindow,
) -> Result<TransactionOutcome, WalletError> {
    let interval = Duration::from_millis(config.polling_interval_ms.max(1));
    let max_attempts = polling_budget(window.span(), config.polling_interval_ms);

    for attempt in 1..=max_attempts {
        sleep(interval).await;
        match session.client().transaction(id, window).await {
            Ok(outcome) => return Ok(outcome),
            Err(LedgerError::PendingLedgerVersion) => {
                debug!(
                    "payment {} still pending (attempt {}/{})",
                    id, attempt, max_attempts
                );
            }
            Err(e) => return Err(WalletError::ConfirmationFailed(e)),
        }
    }

    Err(WalletError::ConfirmationTimeout {
        attempts: max_attempts,
    })
}

/// Number of polling attempts the validation window can justify
///
/// The window spans a known number of ledger closes; once that much wall
/// clock has been polled away the transaction can no longer be included.
fn polling_budget(window_span: u32, interval_ms: u64) -> u32 {
    let wall_clock_ms = u64::from(window_span) * EXPECTED_LEDGER_CLOSE_MS;
    let attempts = (wall_clock_ms / interval_ms.max(1)).max(1);
    u32::try_from(attempts).unwrap_or(u32::MAX)
}
