use std::{env, str::FromStr, sync::Arc};

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use bond_client::{
    ChainConnector, DirectIntentRequest, DirectSource, HttpConnector, ReceiptPoller, ReceiptStatus,
    SmartAccount,
};
use bond_primitives::chains::{ChainRegistry, Token};
use color_eyre::{eyre::eyre, Result};
use dotenv::dotenv;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Parses `SOURCES` given as `chain:amount,chain:amount`.
fn parse_sources(raw: &str) -> Result<Vec<DirectSource>> {
    raw.split(',')
        .map(|entry| {
            let (chain, amount) = entry
                .split_once(':')
                .ok_or_else(|| eyre!("malformed source entry: {entry}"))?;
            Ok(DirectSource {
                chain: chain.trim().to_string(),
                amount: amount.trim().to_string(),
            })
        })
        .collect()
}

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
    let sources = parse_sources(&env::var("SOURCES")?)?;
    let dest_chain = env::var("DEST_CHAIN")?;
    let recipient = Address::from_str(&env::var("RECIPIENT")?)?;
    let amount = env::var("AMOUNT")?;

    let registry = Arc::new(match env::var("REGISTRY_PATH") {
        Ok(path) => ChainRegistry::from_file(&path)?,
        Err(_) => ChainRegistry::testnets(api_key)?,
    });
    let signer = PrivateKeySigner::from_str(priv_key)?;
    let connector = Arc::new(HttpConnector);
    let account = SmartAccount::new(
        signer,
        salt_index,
        &chain,
        registry.clone(),
        connector.clone(),
    )?;

    let prepared = account
        .intent()
        .direct(DirectIntentRequest {
            token: Token::Usdc,
            sources,
            dest_chain,
            recipient,
            amount,
        })
        .await?;

    if !prepared.validation().is_valid {
        for error in &prepared.validation().errors {
            tracing::error!("{error}");
        }
        return Err(eyre!("intent failed validation"));
    }

    let fees = prepared.get_fees().await?;
    tracing::info!("intent fees: {fees}");

    let op_hash = prepared.send().await?;
    tracing::info!("user operation submitted: {op_hash}");

    let bundler = connector.bundler(registry.chain(&chain)?)?;
    match ReceiptPoller::default().poll(bundler.as_ref(), op_hash).await {
        ReceiptStatus::Found(receipt) => {
            tracing::info!("included, success: {}", receipt.success);
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
        ReceiptStatus::NotFound => tracing::warn!("no receipt for {op_hash} yet"),
    }

    Ok(())
}
