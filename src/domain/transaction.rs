use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, Currency, WalletId};

/// Caller-supplied idempotency key, unique per wallet.
pub type TransactionId = Uuid;

/// A request to adjust a wallet balance. Positive `amount` credits the
/// wallet, negative debits it.
///
/// The value itself is ephemeral; once accepted, only the
/// `(wallet_id, id)` pair is durably recorded as the idempotency marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub wallet_id: WalletId,
    pub amount: Cents,
    pub currency: Currency,
}

impl Transaction {
    pub fn new(id: TransactionId, wallet_id: WalletId, amount: Cents, currency: Currency) -> Self {
        Self {
            id,
            wallet_id,
            amount,
            currency,
        }
    }
}
