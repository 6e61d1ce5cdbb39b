//! Wallet facade - currency dispatch layer
//!
//! Routes each call to the module registered for the requested currency
//! code. The registry is fixed at construction time; unknown codes fail
//! with a typed error before anything touches the network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::ledger::{JsonRpcLedgerClient, LedgerClient};
use crate::types::{AccountInfo, ConfirmedOutcome, Currency, GeneratedAddress, TransferRequest};
use crate::xrp::XrpModule;

/// Capability surface every currency module provides
#[async_trait]
pub trait CurrencyModule: Send + Sync {
    /// Generate a fresh address and secret
    async fn generate_address(&self) -> Result<GeneratedAddress, WalletError>;

    /// Query account balance
    async fn get_account_info(&self, address: &str) -> Result<AccountInfo, WalletError>;

    /// Execute a payment and wait for it to reach a validated ledger
    async fn transfer(&self, request: TransferRequest) -> Result<ConfirmedOutcome, WalletError>;
}

/// Multi-currency wallet facade
///
/// Currently wires exactly one module (XRP); every other currency code
/// fails with `UnsupportedCurrency`.
pub struct Wallet {
    modules: HashMap<Currency, Arc<dyn CurrencyModule>>,
}

impl Wallet {
    /// Create a wallet backed by the rippled JSON-RPC client for the
    /// network selected in `config`
    pub fn new(config: WalletConfig) -> Result<Self, WalletError> {
        let client: Arc<dyn LedgerClient> = Arc::new(JsonRpcLedgerClient::new(&config)?);
        Ok(Self::with_client(config, client))
    }

    /// Create a wallet over an explicit ledger client
    ///
    /// Used by tests to substitute a scripted client; the registry shape
    /// is identical to `new`.
    pub fn with_client(config: WalletConfig, client: Arc<dyn LedgerClient>) -> Self {
        let mut modules: HashMap<Currency, Arc<dyn CurrencyModule>> = HashMap::new();
        modules.insert(Currency::Xrp, Arc::new(XrpModule::new(config, client)));
        Self { modules }
    }

    /// Resolve the module registered for a currency code
    pub fn module(&self, currency: &str) -> Result<&Arc<dyn CurrencyModule>, WalletError> {
        let code: Currency = currency
            .parse()
            .map_err(WalletError::UnsupportedCurrency)?;
        self.modules
            .get(&code)
            .ok_or_else(|| WalletError::UnsupportedCurrency(currency.to_string()))
    }

    /// Generate a fresh address for `currency`
    pub async fn generate_address(&self, currency: &str) -> Result<GeneratedAddress, WalletError> {
        self.module(currency)?.generate_address().await
    }

    /// Query the balance of `address` on the `currency` ledger
    pub async fn get_account_info(
        &self,
        currency: &str,
        address: &str,
    ) -> Result<AccountInfo, WalletError> {
        self.module(currency)?.get_account_info(address).await
    }

    /// Transfer `request.amount` from sender to receiver on the `currency`
    /// ledger, waiting for validation
    pub async fn transfer(
        &self,
        currency: &str,
        request: TransferRequest,
    ) -> Result<ConfirmedOutcome, WalletError> {
        self.module(currency)?.transfer(request).await
    }
}
