//! Cross-chain intents and their on-chain encoding.
//!
//! An intent pulls liquidity from one or more source chains and executes a list of calls on the
//! destination chain. The protocol contract expects the outer tuple
//! `(address,uint64,uint64,uint64,uint64[],uint256[],uint64,bytes,uint256)` where the `bytes`
//! field is itself the ABI encoding of `(address,uint256,bytes)[]`.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::{SolCall, SolType, SolValue};
use serde::{Deserialize, Serialize};

use crate::abi::IERC20;
use crate::error::{PrimitivesError, Result};

sol! {
    /// A call executed on the destination chain once the intent is filled.
    #[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    struct IntentDstData {
        address target;
        uint256 value;
        bytes data;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct EncodedIntent {
        address sender;
        uint64 initChainSenderNonce;
        uint64 initChainId;
        uint64 poolId;
        uint64[] srcChainIds;
        uint256[] srcAmounts;
        uint64 dstChainId;
        bytes dstDatas;
        uint256 expires;
    }
}

impl IntentDstData {
    /// `ERC20.transfer(recipient, amount)` on `token`, carrying no native value.
    pub fn token_transfer(token: Address, recipient: Address, amount: U256) -> Self {
        Self {
            target: token,
            value: U256::ZERO,
            data: IERC20::transferCall {
                to: recipient,
                amount,
            }
            .abi_encode()
            .into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentData {
    pub sender: Address,
    /// protocol nonce of the sender on the initiating chain
    pub init_chain_sender_nonce: u64,
    pub init_chain_id: u64,
    pub pool_id: u64,
    pub src_chain_ids: Vec<u64>,
    /// base units, parallel to `src_chain_ids`
    pub src_amounts: Vec<U256>,
    pub dst_chain_id: u64,
    pub dst_datas: Vec<IntentDstData>,
    /// unix timestamp (seconds)
    pub expires: u64,
}

impl IntentData {
    pub fn encode(&self) -> Bytes {
        let dst_datas = self.dst_datas.abi_encode();

        EncodedIntent {
            sender: self.sender,
            initChainSenderNonce: self.init_chain_sender_nonce,
            initChainId: self.init_chain_id,
            poolId: self.pool_id,
            srcChainIds: self.src_chain_ids.clone(),
            srcAmounts: self.src_amounts.clone(),
            dstChainId: self.dst_chain_id,
            dstDatas: dst_datas.into(),
            expires: U256::from(self.expires),
        }
        .abi_encode()
        .into()
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let outer = <EncodedIntent as SolType>::abi_decode(data, true)
            .map_err(|e| PrimitivesError::DecodingError(format!("intent: {e}")))?;
        let dst_datas = <Vec<IntentDstData> as SolValue>::abi_decode(&outer.dstDatas, true)
            .map_err(|e| PrimitivesError::DecodingError(format!("intent dstDatas: {e}")))?;
        let expires = u64::try_from(outer.expires).map_err(|_| {
            PrimitivesError::DecodingError(format!("intent expires {} exceeds u64", outer.expires))
        })?;

        Ok(Self {
            sender: outer.sender,
            init_chain_sender_nonce: outer.initChainSenderNonce,
            init_chain_id: outer.initChainId,
            pool_id: outer.poolId,
            src_chain_ids: outer.srcChainIds,
            src_amounts: outer.srcAmounts,
            dst_chain_id: outer.dstChainId,
            dst_datas,
            expires,
        })
    }
}
