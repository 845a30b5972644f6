//! Chain access seams: contract reads, and the factory that wires readers and bundlers for a
//! registry chain.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use bond_primitives::alloy::network::{Ethereum, Network, TransactionBuilder};
use bond_primitives::alloy::primitives::{Address, Bytes, U256};
use bond_primitives::alloy::providers::{Provider, ProviderBuilder};
use bond_primitives::alloy::sol_types::SolCall;
use bond_primitives::alloy::transports::{Client, Http, Transport, TransportResult};
use bond_primitives::chains::ChainConfig;

use crate::bundler::{BundlerApi, BundlerClient};
use crate::error::{ClientError, PipelineStep, Result};

/// Result of an `eth_call`. A revert is not a transport failure: some contracts answer
/// through their revert payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    Success(Bytes),
    Revert(Bytes),
}

#[async_trait]
pub trait ChainReader: Send + Sync {
    /// `eth_call` of `input` on `to`, sent as `from` when given.
    async fn call(
        &self,
        from: Option<Address>,
        to: Address,
        input: Bytes,
    ) -> TransportResult<CallOutcome>;
    async fn get_code(&self, address: Address) -> TransportResult<Bytes>;
    async fn get_balance(&self, address: Address) -> TransportResult<U256>;
}

/// `ChainReader` over an alloy provider.
pub struct RpcChainReader<T, P, N>
where
    T: Transport + Clone,
    P: Provider<T, N> + Clone,
    N: Network + Clone,
{
    rpc_provider: P,
    phantom_data: PhantomData<(T, N)>,
}

impl<T, P, N> RpcChainReader<T, P, N>
where
    T: Transport + Clone,
    P: Provider<T, N> + Clone,
    N: Network + Clone,
{
    pub fn new(rpc_provider: P) -> Self {
        Self {
            rpc_provider,
            phantom_data: PhantomData,
        }
    }
}

#[async_trait]
impl<T, P, N> ChainReader for RpcChainReader<T, P, N>
where
    T: Transport + Clone,
    P: Provider<T, N> + Clone,
    N: Network + Clone,
{
    async fn call(
        &self,
        from: Option<Address>,
        to: Address,
        input: Bytes,
    ) -> TransportResult<CallOutcome> {
        let mut tx = N::TransactionRequest::default()
            .with_to(to)
            .with_input(input);
        if let Some(from) = from {
            tx.set_from(from);
        }

        match self.rpc_provider.call(&tx).await {
            Ok(data) => Ok(CallOutcome::Success(data)),
            Err(err) => match err.as_error_resp().and_then(|payload| payload.as_revert_data()) {
                Some(data) => Ok(CallOutcome::Revert(data)),
                None => Err(err),
            },
        }
    }

    async fn get_code(&self, address: Address) -> TransportResult<Bytes> {
        self.rpc_provider.get_code_at(address).await
    }

    async fn get_balance(&self, address: Address) -> TransportResult<U256> {
        self.rpc_provider.get_balance(address).await
    }
}

/// Call a view function and decode its return, naming `step` on failure. A revert is an error
/// here.
pub async fn read_contract<C: SolCall>(
    reader: &dyn ChainReader,
    to: Address,
    call: &C,
    step: PipelineStep,
) -> Result<C::Return> {
    read_contract_as(reader, None, to, call, step).await
}

/// `read_contract` with `msg.sender` set to `from`.
pub async fn read_contract_as<C: SolCall>(
    reader: &dyn ChainReader,
    from: Option<Address>,
    to: Address,
    call: &C,
    step: PipelineStep,
) -> Result<C::Return> {
    let outcome = reader
        .call(from, to, call.abi_encode().into())
        .await
        .map_err(|e| ClientError::rpc(step, e))?;

    match outcome {
        CallOutcome::Success(data) => {
            C::abi_decode_returns(&data, true).map_err(|e| ClientError::rpc(step, e))
        }
        CallOutcome::Revert(data) => Err(ClientError::rpc(
            step,
            format!("execution reverted: {data}"),
        )),
    }
}

/// Builds network handles for a registry chain.
pub trait ChainConnector: Send + Sync {
    fn reader(&self, chain: &ChainConfig) -> Result<Arc<dyn ChainReader>>;
    fn bundler(&self, chain: &ChainConfig) -> Result<Arc<dyn BundlerApi>>;
}

/// Plain http for both the rpc endpoint and the sponsor endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpConnector;

impl ChainConnector for HttpConnector {
    fn reader(&self, chain: &ChainConfig) -> Result<Arc<dyn ChainReader>> {
        let rpc_provider = ProviderBuilder::new().on_http(chain.rpc_url.clone());
        Ok(Arc::new(RpcChainReader::<Http<Client>, _, Ethereum>::new(
            rpc_provider,
        )))
    }

    fn bundler(&self, chain: &ChainConfig) -> Result<Arc<dyn BundlerApi>> {
        let client = BundlerClient::new(chain.sponsor_url.clone())
            .map_err(|e| ClientError::ConfigError(format!("{}: {e}", chain.name)))?;
        Ok(Arc::new(client))
    }
}
