//! XRP currency module
//!
//! Implements the wallet capability surface for the XRP Ledger: address
//! generation, balance queries, and the submit-then-poll transfer flow.

pub mod account;
pub mod transfer;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::ledger::LedgerClient;
use crate::session::LedgerSession;
use crate::types::{AccountInfo, ConfirmedOutcome, GeneratedAddress, TransferRequest};
use crate::wallet::CurrencyModule;

/// XRP Ledger wallet module
///
/// Owns the ledger session; all operations on one module share the same
/// cached connection.
pub struct XrpModule {
    config: WalletConfig,
    session: LedgerSession,
}

impl XrpModule {
    pub fn new(config: WalletConfig, client: Arc<dyn LedgerClient>) -> Self {
        Self {
            config,
            session: LedgerSession::new(client),
        }
    }

    /// The module's ledger session
    ///
    /// Exposed so transport integrations can deliver disconnect
    /// notifications.
    pub fn session(&self) -> &LedgerSession {
        &self.session
    }
}

#[async_trait]
impl CurrencyModule for XrpModule {
    async fn generate_address(&self) -> Result<GeneratedAddress, WalletError> {
        // Key generation is local to the ledger client; no session needed.
        Ok(self.session.client().generate_address().await?)
    }

    async fn get_account_info(&self, address: &str) -> Result<AccountInfo, WalletError> {
        account::get_account_info(&self.session, address).await
    }

    async fn transfer(&self, request: TransferRequest) -> Result<ConfirmedOutcome, WalletError> {
        transfer::transfer(&self.session, &self.config, &request).await
    }
}
