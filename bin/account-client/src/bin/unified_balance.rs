use std::{env, str::FromStr, sync::Arc};

use alloy::signers::local::PrivateKeySigner;
use bond_client::{HttpConnector, SmartAccount};
use bond_primitives::chains::{ChainRegistry, Token};
use color_eyre::Result;
use dotenv::dotenv;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_max_level(Level::INFO)
        .init();
    color_eyre::install()?;
    dotenv().ok();

    let priv_key = &env::var("PRIVATE_KEY")?;
    let chain = env::var("CHAIN").unwrap_or_else(|_| "arbitrum_sepolia".to_string());
    let api_key = &env::var("PIMLICO_API_KEY")?;
    let salt_index: u64 = env::var("SALT_INDEX").unwrap_or_else(|_| "0".into()).parse()?;
    let token = Token::from_str(&env::var("TOKEN").unwrap_or_else(|_| "USDC".into()))?;

    let registry = match env::var("REGISTRY_PATH") {
        Ok(path) => ChainRegistry::from_file(&path)?,
        Err(_) => ChainRegistry::testnets(api_key)?,
    };
    let signer = PrivateKeySigner::from_str(priv_key)?;
    let account = SmartAccount::new(
        signer,
        salt_index,
        &chain,
        Arc::new(registry),
        Arc::new(HttpConnector),
    )?;

    let address = account.address().await?;
    tracing::info!("smart account {address} owned by {}", account.owner());

    let unified = account.unified_balance(token).await?;
    for entry in &unified.fragmented {
        match (&entry.balance, &entry.error) {
            (Some(balance), _) => tracing::info!("{}: {balance} {token}", entry.chain),
            (None, Some(error)) => tracing::warn!("{}: unavailable ({error})", entry.chain),
            (None, None) => tracing::warn!("{}: unavailable", entry.chain),
        }
    }
    tracing::info!(
        "unified balance: {} {token} ({} on {chain})",
        unified.balance,
        unified.chain_balance
    );
    println!("{}", serde_json::to_string_pretty(&unified)?);

    Ok(())
}
