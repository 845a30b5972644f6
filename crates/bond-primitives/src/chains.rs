//! Chain registry: the read-only table mapping chain names, chain ids, token addresses and the
//! rpc/sponsor endpoints of every supported chain.
//!
//! The registry is resolved once at startup (built-in table or JSON file) and then shared
//! behind an `Arc` by everything that needs network access. Nothing mutates it afterwards.

use std::{collections::HashSet, fmt, fs, str::FromStr};

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::contracts::ContractAddresses;
use crate::error::{PrimitivesError, Result};

/// base url of the bundler/paymaster service used by the reference deployment
pub const PIMLICO_API_URL: &str = "https://api.pimlico.io/v2";

/// Tokens the protocol runs liquidity pools for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    #[serde(rename = "USDC")]
    Usdc,
}

impl Token {
    /// protocol pool backing this token
    #[must_use]
    pub const fn pool_id(&self) -> u64 {
        match self {
            Token::Usdc => 100_001,
        }
    }

    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Token::Usdc => "USDC",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Token {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "USDC" => Ok(Token::Usdc),
            other => Err(PrimitivesError::UnsupportedToken(other.to_string())),
        }
    }
}

/// One row of the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,
    /// underlying token of the USDC pool on this chain
    pub token_address: Address,
    pub rpc_url: Url,
    /// bundler + paymaster endpoint
    pub sponsor_url: Url,
}

/// On-disk representation of the registry
#[derive(Debug, Deserialize)]
struct RegistryFile {
    chains: Vec<ChainConfig>,
    #[serde(default)]
    contracts: ContractAddresses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainRegistry {
    chains: Vec<ChainConfig>,
    contracts: ContractAddresses,
}

impl ChainRegistry {
    pub fn new(chains: Vec<ChainConfig>, contracts: ContractAddresses) -> Result<Self> {
        if chains.is_empty() {
            return Err(PrimitivesError::ConfigError(
                "chain registry must contain at least one chain".into(),
            ));
        }

        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for chain in &chains {
            if !ids.insert(chain.chain_id) {
                return Err(PrimitivesError::ConfigError(format!(
                    "duplicate chain id {}",
                    chain.chain_id
                )));
            }
            if !names.insert(chain.name.as_str()) {
                return Err(PrimitivesError::ConfigError(format!(
                    "duplicate chain name {}",
                    chain.name
                )));
            }
        }

        Ok(Self { chains, contracts })
    }

    /// Reference testnet deployment (sepolia, polygon amoy, arbitrum sepolia, avalanche fuji)
    /// with sponsorship routed through pimlico using `sponsor_api_key`.
    pub fn testnets(sponsor_api_key: &str) -> Result<Self> {
        let rows = [
            (
                11_155_111u64,
                "sepolia",
                address!("1c7D4B196Cb0C7B01d743Fbc6116a902379C7238"),
                "https://ethereum-sepolia-rpc.publicnode.com",
            ),
            (
                80_002,
                "polygon_amoy",
                address!("41E94Eb019C0762f9Bfcf9Fb1E58725BfB0e7582"),
                "https://rpc-amoy.polygon.technology",
            ),
            (
                421_614,
                "arbitrum_sepolia",
                address!("75faf114eafb1BDbe2F0316DF893fd58CE46AA4d"),
                "https://sepolia-rollup.arbitrum.io/rpc",
            ),
            (
                43_113,
                "avalanche_fuji",
                address!("5425890298aed601595a70AB815c96711a31Bc65"),
                "https://api.avax-test.network/ext/bc/C/rpc",
            ),
        ];

        let chains = rows
            .into_iter()
            .map(|(chain_id, name, token_address, rpc_url)| {
                Ok(ChainConfig {
                    chain_id,
                    name: name.to_string(),
                    token_address,
                    rpc_url: parse_url(rpc_url)?,
                    sponsor_url: parse_url(&format!(
                        "{PIMLICO_API_URL}/{chain_id}/rpc?apikey={sponsor_api_key}"
                    ))?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(chains, ContractAddresses::default())
    }

    pub fn from_json(data: &str) -> Result<Self> {
        let file: RegistryFile = serde_json::from_str(data)
            .map_err(|e| PrimitivesError::ConfigError(format!("invalid registry json: {e}")))?;
        Self::new(file.chains, file.contracts)
    }

    pub fn from_file(path: &str) -> Result<Self> {
        let data = fs::read_to_string(path)
            .map_err(|e| PrimitivesError::ConfigError(format!("failed to read {path}: {e}")))?;
        Self::from_json(&data)
    }

    pub fn chains(&self) -> &[ChainConfig] {
        &self.chains
    }

    pub fn contracts(&self) -> &ContractAddresses {
        &self.contracts
    }

    pub fn chain(&self, name: &str) -> Result<&ChainConfig> {
        self.chains
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| PrimitivesError::UnsupportedChain(name.to_string()))
    }

    pub fn chain_by_id(&self, chain_id: u64) -> Result<&ChainConfig> {
        self.chains
            .iter()
            .find(|c| c.chain_id == chain_id)
            .ok_or_else(|| PrimitivesError::UnsupportedChain(chain_id.to_string()))
    }

    pub fn chain_id(&self, name: &str) -> Result<u64> {
        self.chain(name).map(|c| c.chain_id)
    }

    pub fn chain_name(&self, chain_id: u64) -> Result<&str> {
        self.chain_by_id(chain_id).map(|c| c.name.as_str())
    }

    pub fn token_address(&self, name: &str, token: Token) -> Result<Address> {
        let chain = self.chain(name)?;
        match token {
            Token::Usdc => Ok(chain.token_address),
        }
    }

    pub fn rpc_url(&self, name: &str) -> Result<&Url> {
        self.chain(name).map(|c| &c.rpc_url)
    }

    pub fn sponsor_url(&self, name: &str) -> Result<&Url> {
        self.chain(name).map(|c| &c.sponsor_url)
    }

    pub fn supported_chain_ids(&self) -> Vec<u64> {
        self.chains.iter().map(|c| c.chain_id).collect()
    }

    pub fn is_supported(&self, chain_id: u64) -> bool {
        self.chains.iter().any(|c| c.chain_id == chain_id)
    }
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| PrimitivesError::ConfigError(format!("invalid url {url}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_are_bidirectional() {
        let registry = ChainRegistry::testnets("test-key").unwrap();

        assert_eq!(registry.chain_id("sepolia").unwrap(), 11_155_111);
        assert_eq!(registry.chain_name(43_113).unwrap(), "avalanche_fuji");
        assert_eq!(
            registry.token_address("polygon_amoy", Token::Usdc).unwrap(),
            address!("41E94Eb019C0762f9Bfcf9Fb1E58725BfB0e7582")
        );
        assert_eq!(
            registry.sponsor_url("arbitrum_sepolia").unwrap().as_str(),
            "https://api.pimlico.io/v2/421614/rpc?apikey=test-key"
        );
        assert_eq!(registry.supported_chain_ids().len(), 4);
    }

    #[test]
    fn unknown_keys_are_unsupported() {
        let registry = ChainRegistry::testnets("test-key").unwrap();

        assert!(matches!(
            registry.chain("mainnet"),
            Err(PrimitivesError::UnsupportedChain(name)) if name == "mainnet"
        ));
        assert!(matches!(
            registry.chain_by_id(1),
            Err(PrimitivesError::UnsupportedChain(_))
        ));
        assert!(!registry.is_supported(1));
    }

    #[test]
    fn registry_loads_from_json_with_default_contracts() {
        let registry = ChainRegistry::from_json(
            r#"{
                "chains": [{
                    "chain_id": 31337,
                    "name": "anvil",
                    "token_address": "0x0000000000000000000000000000000000000abc",
                    "rpc_url": "http://localhost:8545",
                    "sponsor_url": "http://localhost:4337"
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(registry.chain_name(31337).unwrap(), "anvil");
        assert_eq!(registry.contracts(), &ContractAddresses::default());
    }

    #[test]
    fn duplicate_rows_are_rejected() {
        let registry = ChainRegistry::testnets("k").unwrap();
        let mut chains = registry.chains().to_vec();
        chains.push(chains[0].clone());

        assert!(matches!(
            ChainRegistry::new(chains, ContractAddresses::default()),
            Err(PrimitivesError::ConfigError(_))
        ));
        assert!(ChainRegistry::new(vec![], ContractAddresses::default()).is_err());
    }

    #[test]
    fn token_symbols_parse() {
        assert_eq!("usdc".parse::<Token>().unwrap(), Token::Usdc);
        assert_eq!(Token::Usdc.pool_id(), 100_001);
        assert!("DAI".parse::<Token>().is_err());
    }
}
