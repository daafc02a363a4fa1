use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::application::LedgerService;
use crate::domain::{format_cents, parse_cents, Currency, Transaction, Wallet, WalletId};

/// Bursa - Idempotent Wallet Ledger
#[derive(Parser)]
#[command(name = "bursa")]
#[command(about = "An idempotent wallet ledger for accounts, backed by SQLite")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "bursa.db")]
    pub database: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Wallet management commands
    #[command(subcommand)]
    Wallet(WalletCommands),

    /// Apply a signed balance adjustment to a wallet
    Apply {
        /// Signed amount (e.g. "50.00" credits, "-30" debits)
        amount: String,

        /// Target wallet ID
        #[arg(short, long)]
        wallet: WalletId,

        /// Currency code (must match the wallet's currency)
        #[arg(short, long)]
        currency: String,

        /// Idempotency key. Generated and printed when omitted; pass the
        /// same key on retry to guarantee the adjustment applies only once.
        #[arg(long)]
        id: Option<Uuid>,
    },
}

#[derive(Subcommand)]
pub enum WalletCommands {
    /// Create a new wallet for an account
    Create {
        /// Owning account ID (UUID)
        account: Uuid,

        /// Currency code (e.g. usd, eur)
        #[arg(short, long)]
        currency: String,
    },

    /// Show a wallet
    Show {
        /// Wallet ID
        id: WalletId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all wallets linked to an account
    List {
        /// Account ID (UUID)
        account: Uuid,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Initialized ledger database at {}", self.database);
                Ok(())
            }
            Commands::Wallet(cmd) => {
                let service = LedgerService::connect(&self.database).await?;
                run_wallet_command(&service, cmd).await
            }
            Commands::Apply {
                amount,
                wallet,
                currency,
                id,
            } => {
                let service = LedgerService::connect(&self.database).await?;
                let amount = parse_cents(&amount).context("Invalid amount")?;
                let currency = Currency::parse(&currency)?;
                let id = id.unwrap_or_else(Uuid::new_v4);

                let transaction = Transaction::new(id, wallet, amount, currency);
                let updated = service.apply_transaction(transaction).await?;

                println!("Applied transaction {} to wallet {}", id, updated.id);
                println!("  New balance: {} {}", format_cents(updated.amount), updated.currency);
                Ok(())
            }
        }
    }
}

async fn run_wallet_command(service: &LedgerService, cmd: WalletCommands) -> Result<()> {
    match cmd {
        WalletCommands::Create { account, currency } => {
            let wallet = service.create_wallet(account, &currency).await?;
            println!("Created wallet {} for account {}", wallet.id, wallet.account);
            print_wallet(&wallet);
            Ok(())
        }
        WalletCommands::Show { id, json } => {
            let wallet = service.get_wallet(id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&wallet)?);
            } else {
                print_wallet(&wallet);
            }
            Ok(())
        }
        WalletCommands::List { account, json } => {
            let wallets = service.list_wallets(account).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&wallets)?);
            } else if wallets.is_empty() {
                println!("No wallets for account {}", account);
            } else {
                for wallet in &wallets {
                    print_wallet(wallet);
                }
            }
            Ok(())
        }
    }
}

fn print_wallet(wallet: &Wallet) {
    println!(
        "Wallet {} [{}]  balance {}  account {}",
        wallet.id,
        wallet.currency,
        format_cents(wallet.amount),
        wallet.account
    );
}
