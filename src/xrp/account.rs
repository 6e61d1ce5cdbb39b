//! XRP account queries

use crate::error::WalletError;
use crate::session::LedgerSession;
use crate::types::AccountInfo;

/// Query the spendable balance of an account
///
/// A missing or blank address fails locally with `InvalidAccount`; nothing
/// reaches the network. Every successful call is a fresh round trip, no
/// caching.
pub async fn get_account_info(
    session: &LedgerSession,
    address: &str,
) -> Result<AccountInfo, WalletError> {
    if address.trim().is_empty() {
        return Err(WalletError::InvalidAccount);
    }

    session.ensure_connected().await?;
    let info = session.client().account_info(address).await?;
    Ok(info)
}
