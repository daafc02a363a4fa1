// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use bursa::application::LedgerService;
use bursa::domain::{Cents, Transaction, Wallet};
use bursa::storage::Repository;
use tempfile::TempDir;
use uuid::Uuid;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Helper to create a bare repository with a temporary database,
/// for tests that exercise the store without the service pre-checks
pub async fn test_repository() -> Result<(Repository, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite:{}?mode=rwc", db_path.to_str().unwrap());
    let repo = Repository::init(&db_url).await?;
    Ok((repo, temp_dir))
}

/// Build a transaction against a wallet with a fresh idempotency key,
/// in the wallet's own currency
pub fn adjustment(wallet: &Wallet, amount: Cents) -> Transaction {
    Transaction::new(Uuid::new_v4(), wallet.id, amount, wallet.currency.clone())
}

/// Create a usd wallet for a fresh account and credit it with `amount`
pub async fn funded_wallet(service: &LedgerService, amount: Cents) -> Result<Wallet> {
    let wallet = service.create_wallet(Uuid::new_v4(), "usd").await?;
    let wallet = service
        .apply_transaction(adjustment(&wallet, amount))
        .await?;
    Ok(wallet)
}
