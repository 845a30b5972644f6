//! Core types for the Bond smart-account client
//!
//! This module re-exports the alloy types downstream crates need so every crate in the
//! workspace builds against one alloy version.

pub mod alloy {
    pub mod primitives {
        pub use alloy::primitives::{
            address, b256, bytes, fixed_bytes, keccak256, Address, Bytes, FixedBytes,
            PrimitiveSignature, B256, U256,
        };
        pub use alloy::primitives::aliases::U192;
    }

    pub mod network {
        pub use alloy::network::{Ethereum, Network, TransactionBuilder};
    }

    pub mod providers {
        pub use alloy::providers::{Provider, ProviderBuilder, RootProvider};
    }

    pub mod transports {
        pub use alloy::transports::{
            http::{Client, Http},
            Transport, TransportErrorKind, TransportResult,
        };
    }

    pub mod sol_types {
        pub use alloy::sol_types::{SolCall, SolError, SolValue};
    }

    pub mod signers {
        pub use alloy::signers::{local::PrivateKeySigner, Signer};
    }
}

pub mod abi;
pub mod account;
pub mod chains;
pub mod contracts;
pub mod error;
pub mod intents;
pub mod user_operation;
pub mod utils;
pub mod validation;

pub use error::{PrimitivesError, Result};
