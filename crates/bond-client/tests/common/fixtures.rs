use std::sync::{Arc, Mutex};

use alloy::primitives::{address, Address, U256};
use alloy::signers::local::PrivateKeySigner;
use bond_client::SmartAccount;
use bond_primitives::chains::{ChainConfig, ChainRegistry};
use bond_primitives::contracts::ContractAddresses;
use rstest::*;

use super::mocks::{EventLog, MockBundler, MockChainReader, MockConnector};

pub const SMART_ACCOUNT: Address = address!("5c0A1F1D2b0A3e7E8e4C5bC1b5B5c5d5e5f5a5b5");
pub const CHAIN_A: u64 = 11_155_111;
pub const CHAIN_B: u64 = 80_002;
pub const CHAIN_C: u64 = 421_614;

#[fixture]
pub fn events() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

#[fixture]
pub fn signer() -> PrivateKeySigner {
    PrivateKeySigner::random()
}

/// Three chains: `chain_a` (connected), `chain_b`, `chain_c`.
#[fixture]
pub fn registry() -> Arc<ChainRegistry> {
    let row = |chain_id: u64, name: &str, token: Address| ChainConfig {
        chain_id,
        name: name.to_string(),
        token_address: token,
        rpc_url: format!("http://{name}.rpc.local").parse().unwrap(),
        sponsor_url: format!("http://{name}.bundler.local").parse().unwrap(),
    };
    Arc::new(
        ChainRegistry::new(
            vec![
                row(CHAIN_A, "chain_a", address!("000000000000000000000000000000000000a0a0")),
                row(CHAIN_B, "chain_b", address!("000000000000000000000000000000000000b0b0")),
                row(CHAIN_C, "chain_c", address!("000000000000000000000000000000000000c0c0")),
            ],
            ContractAddresses::default(),
        )
        .unwrap(),
    )
}

pub fn reader(events: &EventLog) -> MockChainReader {
    MockChainReader::new(SMART_ACCOUNT, events.clone())
}

/// Connector with a default reader and bundler on every chain of `registry`.
pub fn connector_with(
    registry: &ChainRegistry,
    events: &EventLog,
    customize: impl Fn(u64, &mut MockChainReader, &mut MockBundler),
) -> MockConnector {
    let mut connector = MockConnector::default();
    for chain in registry.chains() {
        let mut reader = reader(events);
        let mut bundler = MockBundler::new(events.clone());
        customize(chain.chain_id, &mut reader, &mut bundler);
        connector.readers.insert(chain.chain_id, Arc::new(reader));
        connector.bundlers.insert(chain.chain_id, Arc::new(bundler));
    }
    connector
}

pub fn account(
    signer: PrivateKeySigner,
    registry: Arc<ChainRegistry>,
    connector: MockConnector,
) -> SmartAccount<PrivateKeySigner> {
    SmartAccount::new(signer, 1, "chain_a", registry, Arc::new(connector)).unwrap()
}

pub fn usdc(amount: u64) -> U256 {
    U256::from(amount) * U256::from(1_000_000u64)
}
