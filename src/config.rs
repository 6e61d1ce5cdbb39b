//! Configuration types for ledger-wallet
//!
//! Selects the ledger network the wallet talks to and tunes the
//! confirmation polling loop.

use serde::{Deserialize, Serialize};

/// Defaults for the rippled JSON-RPC endpoints
///
/// Public clusters serve queries, address generation, and submission.
/// Server-side signing is an admin-only rippled method, so transfers
/// require `endpoint` to point at a trusted node with the sign method
/// enabled; against these defaults a transfer fails with
/// `SigningUnavailable` before anything is submitted.
const TESTNET_ENDPOINT: &str = "https://s.altnet.rippletest.net:51234/";
const MAINNET_ENDPOINT: &str = "https://xrplcluster.com/";

/// Milliseconds to wait between checks for a new validated ledger
const DEFAULT_POLLING_INTERVAL_MS: u64 = 1000;

/// Number of future ledger closes a transaction stays eligible for inclusion
const DEFAULT_MAX_LEDGER_VERSION_OFFSET: u32 = 5;

/// Ledger network type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Testnet,
    Mainnet,
}

/// Global wallet configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    pub network: NetworkType,

    /// Custom JSON-RPC endpoint; network default is used when unset
    ///
    /// Must be a trusted rippled node with admin access for transfers to
    /// work; the public network defaults cannot sign.
    pub endpoint: Option<String>,

    /// Delay between confirmation polls, in milliseconds
    pub polling_interval_ms: u64,

    /// Ledger-close offset bounding how long a prepared transaction stays valid
    pub max_ledger_version_offset: u32,
}

impl WalletConfig {
    /// Create default configuration for the test network
    pub fn default_testnet() -> Self {
        Self {
            network: NetworkType::Testnet,
            endpoint: None,
            polling_interval_ms: DEFAULT_POLLING_INTERVAL_MS,
            max_ledger_version_offset: DEFAULT_MAX_LEDGER_VERSION_OFFSET,
        }
    }

    /// Create default configuration for the production network
    pub fn default_mainnet() -> Self {
        Self {
            network: NetworkType::Mainnet,
            ..Self::default_testnet()
        }
    }

    /// Resolve the JSON-RPC endpoint, preferring an explicit override
    pub fn endpoint(&self) -> &str {
        match &self.endpoint {
            Some(url) => url,
            None => match self.network {
                NetworkType::Testnet => TESTNET_ENDPOINT,
                NetworkType::Mainnet => MAINNET_ENDPOINT,
            },
        }
    }

    /// Apply environment variable overrides
    ///
    /// `XRPL_NETWORK` selects `testnet` or `mainnet`; `XRPL_ENDPOINT`
    /// pins a custom JSON-RPC URL.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(network) = std::env::var("XRPL_NETWORK") {
            match network.to_lowercase().as_str() {
                "testnet" => self.network = NetworkType::Testnet,
                "mainnet" => self.network = NetworkType::Mainnet,
                _ => {}
            }
        }
        if let Ok(url) = std::env::var("XRPL_ENDPOINT") {
            self.endpoint = Some(url);
        }
        self
    }
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self::default_testnet()
    }
}
