use chrono::Utc;
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{AccountId, Cents, Currency, Transaction, TransactionId, Wallet, WalletId};

use super::MIGRATION_001_INITIAL;

/// Failures surfaced by the durable layer.
///
/// The first three variants are authoritative invariant rejections,
/// classified from constraint violations inside the atomic unit of work.
/// `Unavailable` is an infrastructure failure: nothing was committed, so
/// the caller may retry with the same idempotency key.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("transaction {transaction_id} was already applied to wallet {wallet_id}")]
    DuplicateTransaction {
        wallet_id: WalletId,
        transaction_id: TransactionId,
    },

    #[error("wallet {wallet_id} does not hold {currency} (or does not exist)")]
    CurrencyMismatch {
        wallet_id: WalletId,
        currency: Currency,
    },

    #[error("applying {amount} would make the balance of wallet {wallet_id} negative")]
    InsufficientFunds { wallet_id: WalletId, amount: Cents },

    #[error("invalid {column} in wallet row: {value:?}")]
    InvalidColumn {
        column: &'static str,
        value: String,
    },

    #[error("{op} failed")]
    Unavailable {
        op: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

fn unavailable(op: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |source| StoreError::Unavailable { op, source }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_check_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_check_violation())
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

/// Repository for persisting wallets and applied-transaction markers.
/// This is the only component that mutates durable wallet state.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = SqlitePool::connect(database_url)
            .await
            .map_err(unavailable("connect to database"))?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .map_err(unavailable("run migration 001"))?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self, StoreError> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Wallet operations
    // ========================

    /// Create a wallet for an account with a zero balance.
    pub async fn create_wallet(
        &self,
        account: AccountId,
        currency: &Currency,
    ) -> Result<Wallet, StoreError> {
        let now = Utc::now().to_rfc3339();
        let row = sqlx::query(
            r#"
            INSERT INTO wallets (account, amount, currency, created_at, updated_at)
            VALUES (?, 0, ?, ?, ?)
            RETURNING id, account, amount, currency
            "#,
        )
        .bind(account.to_string())
        .bind(currency.as_str())
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .map_err(unavailable("insert wallet"))?;

        Self::row_to_wallet(&row)
    }

    /// Get a wallet by ID.
    pub async fn get_wallet(&self, id: WalletId) -> Result<Option<Wallet>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, account, amount, currency
            FROM wallets
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable("fetch wallet"))?;

        match row {
            Some(row) => Ok(Some(Self::row_to_wallet(&row)?)),
            None => Ok(None),
        }
    }

    /// List all wallets linked to an account.
    pub async fn list_wallets(&self, account: AccountId) -> Result<Vec<Wallet>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, account, amount, currency
            FROM wallets
            WHERE account = ?
            ORDER BY id
            "#,
        )
        .bind(account.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(unavailable("list wallets"))?;

        rows.iter().map(Self::row_to_wallet).collect()
    }

    // ========================
    // Transaction operations
    // ========================

    /// Check whether a transaction id was already consumed for a wallet.
    ///
    /// Advisory only: the authoritative check is the marker primary key
    /// inside `process_transaction`.
    pub async fn has_transaction(
        &self,
        wallet_id: WalletId,
        transaction_id: TransactionId,
    ) -> Result<bool, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS count
            FROM wallet_transactions
            WHERE wallet_id = ? AND transaction_id = ?
            "#,
        )
        .bind(wallet_id)
        .bind(transaction_id.to_string())
        .fetch_one(&self.pool)
        .await
        .map_err(unavailable("fetch transaction marker"))?;

        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    /// Apply a transaction as a single atomic unit of work:
    ///
    /// 1. Insert the idempotency marker; a unique violation on
    ///    `(wallet_id, transaction_id)` means the transaction was already
    ///    applied, even by a concurrent caller, and a foreign key violation
    ///    means the target wallet does not exist.
    /// 2. Adjust the balance with a single conditional UPDATE keyed on both
    ///    wallet id and currency; zero rows means wrong currency or missing
    ///    wallet, and a CHECK violation means the balance would go negative.
    ///
    /// Either both writes commit or neither does: every early return drops
    /// the open transaction, which rolls it back.
    pub async fn process_transaction(&self, transaction: &Transaction) -> Result<Wallet, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(unavailable("begin unit of work"))?;

        let now = Utc::now().to_rfc3339();
        let inserted = sqlx::query(
            r#"
            INSERT INTO wallet_transactions (wallet_id, transaction_id, amount, currency, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.wallet_id)
        .bind(transaction.id.to_string())
        .bind(transaction.amount)
        .bind(transaction.currency.as_str())
        .bind(&now)
        .execute(&mut *tx)
        .await;

        if let Err(err) = inserted {
            if is_unique_violation(&err) {
                return Err(StoreError::DuplicateTransaction {
                    wallet_id: transaction.wallet_id,
                    transaction_id: transaction.id,
                });
            }
            // The marker references wallets(id), so a missing wallet is
            // rejected here already. Not-found is permanent, never
            // retryable, and classifies with the conditional update's
            // zero-row case rather than as an engine failure.
            if is_foreign_key_violation(&err) {
                return Err(StoreError::CurrencyMismatch {
                    wallet_id: transaction.wallet_id,
                    currency: transaction.currency.clone(),
                });
            }
            return Err(unavailable("insert transaction marker")(err));
        }

        let updated = sqlx::query(
            r#"
            UPDATE wallets
            SET amount = amount + ?, updated_at = ?
            WHERE id = ? AND currency = ?
            RETURNING id, account, amount, currency
            "#,
        )
        .bind(transaction.amount)
        .bind(&now)
        .bind(transaction.wallet_id)
        .bind(transaction.currency.as_str())
        .fetch_optional(&mut *tx)
        .await;

        let wallet = match updated {
            Ok(Some(row)) => Self::row_to_wallet(&row)?,
            Ok(None) => {
                return Err(StoreError::CurrencyMismatch {
                    wallet_id: transaction.wallet_id,
                    currency: transaction.currency.clone(),
                });
            }
            Err(err) => {
                if is_check_violation(&err) {
                    return Err(StoreError::InsufficientFunds {
                        wallet_id: transaction.wallet_id,
                        amount: transaction.amount,
                    });
                }
                return Err(unavailable("update wallet balance")(err));
            }
        };

        tx.commit()
            .await
            .map_err(unavailable("commit unit of work"))?;

        Ok(wallet)
    }

    fn row_to_wallet(row: &sqlx::sqlite::SqliteRow) -> Result<Wallet, StoreError> {
        let account_str: String = row.get("account");
        let currency_str: String = row.get("currency");

        Ok(Wallet {
            id: row.get("id"),
            account: Uuid::parse_str(&account_str).map_err(|_| StoreError::InvalidColumn {
                column: "account",
                value: account_str,
            })?,
            amount: row.get("amount"),
            currency: Currency::parse(&currency_str).map_err(|_| StoreError::InvalidColumn {
                column: "currency",
                value: currency_str,
            })?,
        })
    }
}
