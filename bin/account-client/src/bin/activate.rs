use std::{env, str::FromStr, sync::Arc};

use alloy::signers::local::PrivateKeySigner;
use bond_client::{AccountStatus, HttpConnector, SmartAccount};
use bond_primitives::chains::ChainRegistry;
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

    let targets: Vec<String> = match env::var("ACTIVATE_CHAINS") {
        Ok(list) => list.split(',').map(|c| c.trim().to_string()).collect(),
        Err(_) => account
            .registry()
            .chains()
            .iter()
            .map(|c| c.name.clone())
            .collect(),
    };

    for target in targets {
        if account.status(&target).await? == AccountStatus::Activated {
            tracing::info!("{target}: already activated");
            continue;
        }
        let op_hash = account.activate(&target).await?;
        tracing::info!("{target}: activation submitted as {op_hash}");
    }

    Ok(())
}
