//! UserOperation lifecycle.
//!
//! An operation is assembled in a fixed order: draft (sender, nonce, init code, call data and a
//! dummy signature), gas price, sponsorship, hash, signature. Each stage is its own type so a
//! field that feeds the operation hash cannot change after the hash is taken.

use alloy::primitives::{Address, Bytes, B256, U256};
use serde::{Deserialize, Serialize};

use crate::abi::UserOperation;
use crate::utils::dummy_signature;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasPriceTier {
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
}

/// `pimlico_getUserOperationGasPrice` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasPriceQuote {
    pub slow: GasPriceTier,
    pub standard: GasPriceTier,
    pub fast: GasPriceTier,
}

/// `pm_sponsorUserOperation` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sponsorship {
    pub paymaster_and_data: Bytes,
    pub pre_verification_gas: U256,
    pub verification_gas_limit: U256,
    pub call_gas_limit: U256,
}

/// `eth_getUserOperationReceipt` response. The inner transaction receipt is kept as raw json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOperationReceipt {
    pub user_op_hash: B256,
    pub sender: Address,
    pub nonce: U256,
    pub success: bool,
    pub actual_gas_cost: U256,
    pub actual_gas_used: U256,
    #[serde(default)]
    pub paymaster: Option<Address>,
    #[serde(default)]
    pub receipt: serde_json::Value,
}

/// Operation whose fee fields can still be set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftUserOperation {
    op: UserOperation,
}

impl DraftUserOperation {
    /// Gas fields start at zero, `paymasterAndData` empty and the signature is a single-signer
    /// dummy so the bundler can size the operation.
    pub fn new(sender: Address, nonce: U256, init_code: Bytes, call_data: Bytes) -> Self {
        Self {
            op: UserOperation {
                sender,
                nonce,
                initCode: init_code,
                callData: call_data,
                signature: dummy_signature(1),
                ..Default::default()
            },
        }
    }

    pub fn with_gas_price(mut self, tier: &GasPriceTier) -> Self {
        self.op.maxFeePerGas = tier.max_fee_per_gas;
        self.op.maxPriorityFeePerGas = tier.max_priority_fee_per_gas;
        self
    }

    pub fn as_user_operation(&self) -> &UserOperation {
        &self.op
    }

    pub fn sponsor(mut self, sponsorship: Sponsorship) -> SponsoredUserOperation {
        self.op.paymasterAndData = sponsorship.paymaster_and_data;
        self.op.preVerificationGas = sponsorship.pre_verification_gas;
        self.op.verificationGasLimit = sponsorship.verification_gas_limit;
        self.op.callGasLimit = sponsorship.call_gas_limit;
        SponsoredUserOperation { op: self.op }
    }
}

/// Every hashed field is final. Can only be hashed (by reading it) or signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsoredUserOperation {
    op: UserOperation,
}

impl SponsoredUserOperation {
    pub fn as_user_operation(&self) -> &UserOperation {
        &self.op
    }

    /// Install the owner signature over `hash`.
    pub fn into_signed(mut self, signature: Bytes, hash: B256) -> SignedUserOperation {
        self.op.signature = signature;
        SignedUserOperation { op: self.op, hash }
    }
}

/// Ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUserOperation {
    op: UserOperation,
    hash: B256,
}

impl SignedUserOperation {
    pub fn user_operation(&self) -> &UserOperation {
        &self.op
    }

    /// the userOpHash the signature commits to
    pub fn hash(&self) -> B256 {
        self.hash
    }

    pub fn into_user_operation(self) -> UserOperation {
        self.op
    }
}
