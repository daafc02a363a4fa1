use tracing::debug;

use crate::domain::{AccountId, Currency, Transaction, Wallet, WalletId};
use crate::storage::Repository;

use super::LedgerError;

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI, RPC handler, etc.).
///
/// Holds no state of its own beyond the repository handle, so any number
/// of instances may run against the same database.
pub struct LedgerService {
    repo: Repository,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, LedgerError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, LedgerError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Wallet operations
    // ========================

    /// Create a new wallet for an account. The currency code is validated
    /// and normalized before any store access.
    pub async fn create_wallet(
        &self,
        account: AccountId,
        currency: &str,
    ) -> Result<Wallet, LedgerError> {
        let currency = Currency::parse(currency)?;
        let wallet = self.repo.create_wallet(account, &currency).await?;
        debug!(wallet = wallet.id, %account, %currency, "created wallet");
        Ok(wallet)
    }

    /// Get a wallet by ID.
    pub async fn get_wallet(&self, id: WalletId) -> Result<Wallet, LedgerError> {
        self.repo
            .get_wallet(id)
            .await?
            .ok_or(LedgerError::WalletNotFound(id))
    }

    /// List all wallets linked to an account. An empty list is not an error.
    pub async fn list_wallets(&self, account: AccountId) -> Result<Vec<Wallet>, LedgerError> {
        Ok(self.repo.list_wallets(account).await?)
    }

    // ========================
    // Transaction application
    // ========================

    /// Apply a signed balance adjustment to a wallet, exactly once per
    /// idempotency key.
    ///
    /// The checks before `process_transaction` are advisory: they reject
    /// most invalid requests without opening a write transaction, but each
    /// one is re-enforced inside the store's atomic unit of work, which
    /// closes the race window between the pre-check and the write.
    pub async fn apply_transaction(&self, transaction: Transaction) -> Result<Wallet, LedgerError> {
        // An I/O failure here must not be read as "not applied".
        if self
            .repo
            .has_transaction(transaction.wallet_id, transaction.id)
            .await?
        {
            return Err(LedgerError::DuplicateTransaction {
                wallet_id: transaction.wallet_id,
                transaction_id: transaction.id,
            });
        }

        let wallet = self.get_wallet(transaction.wallet_id).await?;

        if wallet.currency != transaction.currency {
            return Err(LedgerError::CurrencyMismatch {
                wallet_id: wallet.id,
                currency: transaction.currency,
            });
        }

        // An overflowing projection can never commit (the stored balance
        // would overflow too), so it is rejected like a negative one.
        match wallet.amount.checked_add(transaction.amount) {
            Some(projected) if projected >= 0 => {}
            _ => {
                return Err(LedgerError::InsufficientFunds {
                    wallet_id: wallet.id,
                    amount: transaction.amount,
                });
            }
        }

        let wallet = self.repo.process_transaction(&transaction).await?;
        debug!(
            wallet = wallet.id,
            transaction = %transaction.id,
            amount = transaction.amount,
            balance = wallet.amount,
            "applied transaction"
        );
        Ok(wallet)
    }
}
