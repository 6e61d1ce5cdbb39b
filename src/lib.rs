//! Ledger Wallet
//!
//! Thin multi-currency wallet facade over distributed-ledger clients.
//! Currently wires the XRP Ledger: address generation, balance lookup, and
//! a submit-then-poll payment transfer that waits for inclusion in a
//! validated ledger.
//!
//! # Example
//!
//! ```ignore
//! use ledger_wallet::{Wallet, WalletConfig, TransferRequest};
//!
//! let wallet = Wallet::new(WalletConfig::default_testnet())?;
//! let outcome = wallet
//!     .transfer("XRP", TransferRequest {
//!         sender_address: "rSender...".into(),
//!         sender_secret: "sSecret...".into(),
//!         receiver_address: "rReceiver...".into(),
//!         amount: "0.01".into(),
//!     })
//!     .await?;
//! println!("validated: {} (fee {})", outcome.id, outcome.fee);
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod session;
pub mod types;
pub mod wallet;
pub mod xrp;

pub use config::{NetworkType, WalletConfig};
pub use error::WalletError;
pub use session::{ConnectionState, LedgerSession};
pub use types::{AccountInfo, ConfirmedOutcome, Currency, GeneratedAddress, TransferRequest};
pub use wallet::{CurrencyModule, Wallet};
