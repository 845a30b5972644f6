use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::sol_types::SolCall;
use serde::{Deserialize, Serialize};

use crate::abi::IAccountFactory;

/// 32-byte account salt: `index` big-endian in the low bytes, zero padded on the left.
#[must_use]
pub fn account_salt(index: u64) -> B256 {
    B256::from(U256::from(index))
}

/// Factory address followed by `createAccount(owner, salt)` call data.
#[must_use]
pub fn init_code(factory: Address, owner: Address, salt: B256) -> Bytes {
    let call = IAccountFactory::createAccountCall { owner, salt }.abi_encode();
    [factory.as_slice(), call.as_slice()].concat().into()
}

/// Smart account address on one chain, with the init code needed to deploy it there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterfactualAddress {
    pub address: Address,
    /// empty once the account is deployed on the chain
    pub init_code: Bytes,
}

impl CounterfactualAddress {
    pub fn is_deployed(&self) -> bool {
        self.init_code.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256};

    #[test]
    fn salt_is_left_padded() {
        assert_eq!(
            account_salt(1),
            b256!("0000000000000000000000000000000000000000000000000000000000000001")
        );
        assert_eq!(
            account_salt(0x1234),
            b256!("0000000000000000000000000000000000000000000000000000000000001234")
        );
        assert_eq!(account_salt(0), B256::ZERO);
    }

    #[test]
    fn init_code_prefixes_factory() {
        let factory = address!("2DebAA8f9F2B53ceEc3662FdB4D2eDA58b132B6d");
        let owner = address!("00000000000000000000000000000000000000aa");
        let code = init_code(factory, owner, account_salt(1));

        assert_eq!(&code[..20], factory.as_slice());
        assert_eq!(code[20..24], IAccountFactory::createAccountCall::SELECTOR);
        // selector + two words
        assert_eq!(code.len(), 20 + 4 + 64);

        let decoded = IAccountFactory::createAccountCall::abi_decode(&code[20..], true).unwrap();
        assert_eq!(decoded.owner, owner);
        assert_eq!(decoded.salt, account_salt(1));
    }
}
