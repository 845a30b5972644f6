//! Intent facade: assembles protocol intents for a smart account and prepares them for fee
//! quoting and submission.

use std::sync::Arc;

use bond_primitives::abi::{IProtocol, IERC20};
use bond_primitives::account::CounterfactualAddress;
use bond_primitives::alloy::primitives::{Address, Bytes, B256, U256};
use bond_primitives::alloy::signers::Signer;
use bond_primitives::alloy::sol_types::SolCall;
use bond_primitives::chains::{ChainConfig, Token};
use bond_primitives::intents::{IntentData, IntentDstData};
use bond_primitives::utils::parse_token_units;
use bond_primitives::validation::{IntentValidationConfig, IntentValidator, ValidationResult};
use bond_primitives::PrimitivesError;

use crate::account::{Call, SmartAccount};
use crate::error::{ClientError, PipelineStep, Result};
use crate::network::{read_contract, read_contract_as, ChainReader};

/// Intents expire two hours after they are prepared.
pub const INTENT_LIFETIME_SECS: u64 = 2 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentSource {
    pub chain: String,
    /// base units
    pub amount: U256,
}

/// Caller-supplied destination calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIntentRequest {
    pub token: Token,
    pub sources: Vec<IntentSource>,
    pub dest_chain: String,
    pub dest_calls: Vec<IntentDstData>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectSource {
    pub chain: String,
    /// decimal string, e.g. `"2.5"`
    pub amount: String,
}

/// Move `amount` of `token` to `recipient` on `dest_chain`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectIntentRequest {
    pub token: Token,
    pub sources: Vec<DirectSource>,
    pub dest_chain: String,
    pub recipient: Address,
    /// decimal string
    pub amount: String,
}

pub struct IntentClient<'a, S> {
    account: &'a SmartAccount<S>,
}

impl<'a, S> IntentClient<'a, S>
where
    S: Signer + Send + Sync,
{
    pub(crate) fn new(account: &'a SmartAccount<S>) -> Self {
        Self { account }
    }

    pub async fn raw(&self, request: RawIntentRequest) -> Result<PreparedIntent<'a, S>> {
        let (sources, amounts): (Vec<_>, Vec<_>) = request
            .sources
            .into_iter()
            .map(|source| (source.chain, source.amount))
            .unzip();

        self.prepare(request.token, &sources, amounts, &request.dest_chain, request.dest_calls)
            .await
    }

    pub async fn direct(&self, request: DirectIntentRequest) -> Result<PreparedIntent<'a, S>> {
        let registry = self.account.registry();
        let chain = self.account.chain();
        let reader = self.account.reader(chain)?;

        let source_token = registry.token_address(&chain.name, request.token)?;
        let dest_token = registry.token_address(&request.dest_chain, request.token)?;

        let decimals = read_contract(
            reader.as_ref(),
            source_token,
            &IERC20::decimalsCall {},
            PipelineStep::TokenDecimals,
        )
        .await?
        .decimals;
        tracing::debug!(token = %request.token, decimals, "read token decimals");

        let mut sources = Vec::with_capacity(request.sources.len());
        let mut amounts = Vec::with_capacity(request.sources.len());
        for source in request.sources {
            amounts.push(parse_token_units(&source.amount, decimals)?);
            sources.push(source.chain);
        }

        let transfer = IntentDstData::token_transfer(
            dest_token,
            request.recipient,
            parse_token_units(&request.amount, decimals)?,
        );

        self.prepare(request.token, &sources, amounts, &request.dest_chain, vec![transfer])
            .await
    }

    async fn prepare(
        &self,
        token: Token,
        sources: &[String],
        src_amounts: Vec<U256>,
        dest_chain: &str,
        dst_datas: Vec<IntentDstData>,
    ) -> Result<PreparedIntent<'a, S>> {
        let registry = self.account.registry();
        let chain = self.account.chain().clone();
        let reader = self.account.reader(&chain)?;
        let account = self.account.resolve_with(reader.as_ref()).await?;

        let nonce = read_contract_as(
            reader.as_ref(),
            Some(account.address),
            registry.contracts().protocol,
            &IProtocol::getNonceCall {
                account: account.address,
            },
            PipelineStep::ProtocolNonce,
        )
        .await?
        .nonce;
        let init_chain_sender_nonce = u64::try_from(nonce).map_err(|_| {
            PrimitivesError::EncodingError(format!("protocol nonce {nonce} exceeds uint64"))
        })?;

        let src_chain_ids = sources
            .iter()
            .map(|name| registry.chain_id(name))
            .collect::<bond_primitives::Result<Vec<_>>>()?;

        let now = u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default();
        let intent = IntentData {
            sender: account.address,
            init_chain_sender_nonce,
            init_chain_id: chain.chain_id,
            pool_id: token.pool_id(),
            src_chain_ids,
            src_amounts,
            dst_chain_id: registry.chain_id(dest_chain)?,
            dst_datas,
            expires: now + INTENT_LIFETIME_SECS,
        };

        let validation = IntentValidator::new(IntentValidationConfig::from_registry(registry))
            .validate(&intent, now);
        if !validation.is_valid {
            tracing::warn!("prepared intent failed validation: {:?}", validation.errors);
        }

        let data = intent.encode();
        tracing::info!(
            sender = %intent.sender,
            nonce = intent.init_chain_sender_nonce,
            dst_chain_id = intent.dst_chain_id,
            "prepared intent"
        );

        Ok(PreparedIntent {
            account: self.account,
            chain,
            reader,
            sender: account,
            intent,
            data,
            validation,
        })
    }
}

/// An encoded intent bound to the account and chain it was prepared on.
pub struct PreparedIntent<'a, S> {
    account: &'a SmartAccount<S>,
    chain: ChainConfig,
    reader: Arc<dyn ChainReader>,
    sender: CounterfactualAddress,
    intent: IntentData,
    data: Bytes,
    validation: ValidationResult,
}

impl<S> PreparedIntent<'_, S>
where
    S: Signer + Send + Sync,
{
    /// ABI encoded intent as passed to `submitIntent`
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn intent(&self) -> &IntentData {
        &self.intent
    }

    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    pub fn sender(&self) -> &CounterfactualAddress {
        &self.sender
    }

    /// Protocol fee for this intent, in base units of the pool token.
    pub async fn get_fees(&self) -> Result<U256> {
        let fees = read_contract_as(
            self.reader.as_ref(),
            Some(self.sender.address),
            self.account.registry().contracts().protocol,
            &IProtocol::getFeesCall {
                intentData: self.data.clone(),
            },
            PipelineStep::IntentFees,
        )
        .await?
        .fees;
        Ok(fees)
    }

    /// Submit the intent through a user operation on the preparing chain. Each call submits a
    /// new operation.
    pub async fn send(&self) -> Result<B256> {
        if !self.validation.is_valid {
            return Err(ClientError::ValidationFailed(self.validation.clone()));
        }

        let submit = IProtocol::submitIntentCall {
            intentData: self.data.clone(),
        };
        let call = Call {
            to: self.account.registry().contracts().protocol,
            value: U256::ZERO,
            data: submit.abi_encode().into(),
        };

        self.account
            .submit_call(
                &self.chain,
                self.reader.as_ref(),
                &self.sender,
                call.into_execute_calldata(),
            )
            .await
    }
}
