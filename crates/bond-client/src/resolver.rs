use bond_primitives::abi::IEntryPoint;
use bond_primitives::account::{init_code, CounterfactualAddress};
use bond_primitives::alloy::primitives::{Address, Bytes, B256};
use bond_primitives::alloy::sol_types::SolCall;
use bond_primitives::contracts::ContractAddresses;

use crate::error::{ClientError, PipelineStep, Result};
use crate::network::{CallOutcome, ChainReader};

const ADDRESS_LEN: usize = 20;

/// Derives the counterfactual smart account address of an owner through
/// `EntryPoint.getSenderAddress`, which always answers by reverting with
/// `SenderAddressResult(address)`.
#[derive(Debug, Clone, Copy)]
pub struct AddressResolver {
    entrypoint: Address,
    account_factory: Address,
}

impl AddressResolver {
    pub fn new(contracts: &ContractAddresses) -> Self {
        Self {
            entrypoint: contracts.entrypoint,
            account_factory: contracts.account_factory,
        }
    }

    pub async fn resolve(
        &self,
        reader: &dyn ChainReader,
        owner: Address,
        salt: B256,
    ) -> Result<CounterfactualAddress> {
        let init_code = init_code(self.account_factory, owner, salt);
        let call = IEntryPoint::getSenderAddressCall {
            initCode: init_code.clone(),
        };

        let outcome = reader
            .call(None, self.entrypoint, call.abi_encode().into())
            .await
            .map_err(|e| ClientError::rpc(PipelineStep::AddressDerivation, e))?;

        let payload = match outcome {
            CallOutcome::Revert(payload) => payload,
            CallOutcome::Success(_) => {
                return Err(ClientError::ProtocolViolation(
                    "expected getSenderAddress to revert".into(),
                ))
            }
        };
        if payload.len() < ADDRESS_LEN {
            return Err(ClientError::ProtocolViolation(format!(
                "getSenderAddress revert payload too short: {payload}"
            )));
        }
        let address = Address::from_slice(&payload[payload.len() - ADDRESS_LEN..]);

        let init_code = match reader.get_code(address).await {
            Ok(code) if !code.is_empty() => Bytes::new(),
            Ok(_) => init_code,
            Err(err) => {
                tracing::warn!(%address, "code probe failed, assuming not deployed: {err}");
                init_code
            }
        };
        tracing::debug!(%owner, %address, deployed = init_code.is_empty(), "resolved account");

        Ok(CounterfactualAddress { address, init_code })
    }
}
