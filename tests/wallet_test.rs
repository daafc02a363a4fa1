mod common;

use anyhow::Result;
use bursa::application::LedgerError;
use common::test_service;
use uuid::Uuid;

#[tokio::test]
async fn test_create_wallet_starts_empty() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let account = Uuid::new_v4();
    let wallet = service.create_wallet(account, "usd").await?;

    assert!(wallet.id > 0);
    assert_eq!(wallet.account, account);
    assert_eq!(wallet.amount, 0);
    assert_eq!(wallet.currency.as_str(), "usd");
    Ok(())
}

#[tokio::test]
async fn test_create_wallet_normalizes_currency_case() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = Uuid::new_v4();

    let eur = service.create_wallet(account, "EUR").await?;
    assert_eq!(eur.currency.as_str(), "eur");

    let jpy = service.create_wallet(account, "jPy").await?;
    assert_eq!(jpy.currency.as_str(), "jpy");
    Ok(())
}

#[tokio::test]
async fn test_create_wallet_rejects_invalid_currency() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let account = Uuid::new_v4();

    for bad in ["", "   ", "test", "us", "u$d"] {
        let err = service.create_wallet(account, bad).await.unwrap_err();
        assert!(
            matches!(err, LedgerError::InvalidCurrency(_)),
            "currency {bad:?} should be rejected, got {err:?}"
        );
    }

    // Nothing was persisted for the rejected inputs
    assert!(service.list_wallets(account).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_get_wallet_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.get_wallet(42).await.unwrap_err();
    assert!(matches!(err, LedgerError::WalletNotFound(42)));
    Ok(())
}

#[tokio::test]
async fn test_get_wallet_roundtrip() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let created = service.create_wallet(Uuid::new_v4(), "usd").await?;
    let fetched = service.get_wallet(created.id).await?;
    assert_eq!(fetched, created);
    Ok(())
}

#[tokio::test]
async fn test_list_wallets_is_scoped_to_account() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    // Several wallets per account are allowed, including same-currency ones
    let w1 = service.create_wallet(alice, "usd").await?;
    let w2 = service.create_wallet(alice, "usd").await?;
    let w3 = service.create_wallet(alice, "eur").await?;
    service.create_wallet(bob, "usd").await?;

    let wallets = service.list_wallets(alice).await?;
    assert_eq!(
        wallets.iter().map(|w| w.id).collect::<Vec<_>>(),
        vec![w1.id, w2.id, w3.id]
    );
    assert!(wallets.iter().all(|w| w.account == alice));
    Ok(())
}

#[tokio::test]
async fn test_list_wallets_empty_account() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let wallets = service.list_wallets(Uuid::new_v4()).await?;
    assert!(wallets.is_empty());
    Ok(())
}
