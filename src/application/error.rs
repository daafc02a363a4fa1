use thiserror::Error;

use crate::domain::{Cents, Currency, ParseCurrencyError, TransactionId, WalletId};
use crate::storage::StoreError;

/// Everything the ledger can refuse to do.
///
/// `DuplicateTransaction` is terminal for its idempotency key: the
/// transaction's effect is already durably committed, so a caller retrying
/// under idempotency semantics should treat it as success-already-happened.
/// Only `Store` is retryable with the same key.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid currency: {0}")]
    InvalidCurrency(#[from] ParseCurrencyError),

    #[error("wallet not found: {0}")]
    WalletNotFound(WalletId),

    #[error("transaction {transaction_id} was already applied to wallet {wallet_id}")]
    DuplicateTransaction {
        wallet_id: WalletId,
        transaction_id: TransactionId,
    },

    #[error("wallet {wallet_id} does not hold {currency}")]
    CurrencyMismatch {
        wallet_id: WalletId,
        currency: Currency,
    },

    #[error("insufficient funds in wallet {wallet_id} for amount {amount}")]
    InsufficientFunds { wallet_id: WalletId, amount: Cents },

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateTransaction {
                wallet_id,
                transaction_id,
            } => LedgerError::DuplicateTransaction {
                wallet_id,
                transaction_id,
            },
            StoreError::CurrencyMismatch {
                wallet_id,
                currency,
            } => LedgerError::CurrencyMismatch {
                wallet_id,
                currency,
            },
            StoreError::InsufficientFunds { wallet_id, amount } => {
                LedgerError::InsufficientFunds { wallet_id, amount }
            }
            err => LedgerError::Store(err),
        }
    }
}
