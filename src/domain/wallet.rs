use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, Currency};

/// Wallet identifier, assigned by the store at creation (always positive).
pub type WalletId = i64;

/// External account identifier. An account may own any number of wallets.
pub type AccountId = Uuid;

/// A single-currency balance belonging to an account.
///
/// `amount` is never negative after a committed transaction and `currency`
/// never changes for the lifetime of the wallet; both invariants are
/// enforced by the store, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub account: AccountId,
    pub amount: Cents,
    pub currency: Currency,
}
