use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// EntryPoint v0.6, same address on every supported chain
pub const ENTRYPOINT_ADDRESS: Address = address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");

/// Smart account factory
pub const ACCOUNT_FACTORY_ADDRESS: Address = address!("2DebAA8f9F2B53ceEc3662FdB4D2eDA58b132B6d");

/// Intent settlement protocol
pub const PROTOCOL_ADDRESS: Address = address!("1F4899e17F9eEc08B91a48f8A5be12Bca14F18a6");

/// Deployed contract set the client interacts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    pub entrypoint: Address,
    pub account_factory: Address,
    pub protocol: Address,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            entrypoint: ENTRYPOINT_ADDRESS,
            account_factory: ACCOUNT_FACTORY_ADDRESS,
            protocol: PROTOCOL_ADDRESS,
        }
    }
}
