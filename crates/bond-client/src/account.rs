//! Smart account facade: one owner key + salt, usable on every registry chain.

use std::sync::Arc;
use std::time::Duration;

use bond_primitives::abi::{IAccount, IERC20};
use bond_primitives::account::{account_salt, CounterfactualAddress};
use bond_primitives::alloy::primitives::{Address, Bytes, B256, U256};
use bond_primitives::alloy::signers::Signer;
use bond_primitives::alloy::sol_types::SolCall;
use bond_primitives::chains::{ChainConfig, ChainRegistry, Token};
use bond_primitives::utils::to_display_units;
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, PipelineStep, Result};
use crate::intent::IntentClient;
use crate::network::{read_contract, ChainConnector, ChainReader};
use crate::operation::OperationBuilder;
use crate::resolver::AddressResolver;

/// Allowance granted to the protocol on activation, 100 tokens at 6 decimals.
pub const ACTIVATION_ALLOWANCE: u64 = 100_000_000;
/// Balances are reported in whole tokens assuming 6 decimals.
pub const BALANCE_DECIMALS: u8 = 6;
pub const DEFAULT_BALANCE_TIMEOUT: Duration = Duration::from_secs(15);

/// A call executed by the smart account through `execute(to, value, data)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Call {
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl Call {
    pub fn into_execute_calldata(self) -> Bytes {
        IAccount::executeCall {
            dest: self.to,
            value: self.value,
            func: self.data,
        }
        .abi_encode()
        .into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    /// address known, not deployed on the chain yet
    Resolved,
    /// deployed on the chain
    Activated,
}

impl From<&CounterfactualAddress> for AccountStatus {
    fn from(account: &CounterfactualAddress) -> Self {
        if account.is_deployed() {
            AccountStatus::Activated
        } else {
            AccountStatus::Resolved
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainBalance {
    pub chain: String,
    pub chain_id: u64,
    /// `None` when the chain could not be queried
    pub balance: Option<f64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedBalance {
    pub balance: f64,
    pub fragmented: Vec<ChainBalance>,
    /// balance on the connected chain
    pub chain_balance: f64,
}

pub struct SmartAccount<S> {
    signer: S,
    salt: B256,
    chain: ChainConfig,
    registry: Arc<ChainRegistry>,
    connector: Arc<dyn ChainConnector>,
    balance_timeout: Duration,
}

impl<S> SmartAccount<S>
where
    S: Signer + Send + Sync,
{
    /// Bind `signer` and the salt derived from `salt_index`, connected to `chain`.
    pub fn new(
        signer: S,
        salt_index: u64,
        chain: &str,
        registry: Arc<ChainRegistry>,
        connector: Arc<dyn ChainConnector>,
    ) -> Result<Self> {
        let chain = registry.chain(chain)?.clone();
        Ok(Self {
            signer,
            salt: account_salt(salt_index),
            chain,
            registry,
            connector,
            balance_timeout: DEFAULT_BALANCE_TIMEOUT,
        })
    }

    pub fn with_balance_timeout(mut self, balance_timeout: Duration) -> Self {
        self.balance_timeout = balance_timeout;
        self
    }

    pub fn owner(&self) -> Address {
        self.signer.address()
    }

    pub fn salt(&self) -> B256 {
        self.salt
    }

    /// the connected chain
    pub fn chain(&self) -> &ChainConfig {
        &self.chain
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    pub(crate) fn reader(&self, chain: &ChainConfig) -> Result<Arc<dyn ChainReader>> {
        self.connector.reader(chain)
    }

    pub(crate) async fn resolve_with(
        &self,
        reader: &dyn ChainReader,
    ) -> Result<CounterfactualAddress> {
        AddressResolver::new(self.registry.contracts())
            .resolve(reader, self.owner(), self.salt)
            .await
    }

    pub async fn counterfactual(&self, chain: &str) -> Result<CounterfactualAddress> {
        let chain = self.registry.chain(chain)?;
        let reader = self.reader(chain)?;
        self.resolve_with(reader.as_ref()).await
    }

    /// Smart account address. Identical on every chain.
    pub async fn address(&self) -> Result<Address> {
        let reader = self.reader(&self.chain)?;
        Ok(self.resolve_with(reader.as_ref()).await?.address)
    }

    pub async fn status(&self, chain: &str) -> Result<AccountStatus> {
        Ok(AccountStatus::from(&self.counterfactual(chain).await?))
    }

    /// Build, sign and submit an operation carrying `call_data` for `account` on `chain`.
    pub(crate) async fn submit_call(
        &self,
        chain: &ChainConfig,
        reader: &dyn ChainReader,
        account: &CounterfactualAddress,
        call_data: Bytes,
    ) -> Result<B256> {
        let bundler = self.connector.bundler(chain)?;
        let builder = OperationBuilder::new(self.registry.contracts().entrypoint);

        tracing::info!(chain = %chain.name, sender = %account.address, "building user operation");
        let signed = builder
            .build(
                reader,
                bundler.as_ref(),
                account.address,
                account.init_code.clone(),
                call_data,
                &self.signer,
            )
            .await?;

        builder.submit(bundler.as_ref(), signed).await
    }

    /// Execute `call` from the smart account on the connected chain, deploying it first if
    /// needed.
    pub async fn send_user_operation(&self, call: Call) -> Result<B256> {
        let reader = self.reader(&self.chain)?;
        let account = self.resolve_with(reader.as_ref()).await?;
        self.submit_call(
            &self.chain,
            reader.as_ref(),
            &account,
            call.into_execute_calldata(),
        )
        .await
    }

    /// Deploy the account on `chain` by approving the protocol to pull its pool token.
    pub async fn activate(&self, chain: &str) -> Result<B256> {
        let chain = self.registry.chain(chain)?.clone();
        let reader = self.reader(&chain)?;
        let account = self.resolve_with(reader.as_ref()).await?;

        let approve = IERC20::approveCall {
            spender: self.registry.contracts().protocol,
            amount: U256::from(ACTIVATION_ALLOWANCE),
        };
        let call = Call {
            to: chain.token_address,
            value: U256::ZERO,
            data: approve.abi_encode().into(),
        };

        tracing::info!(chain = %chain.name, deployed = account.is_deployed(), "activating account");
        self.submit_call(&chain, reader.as_ref(), &account, call.into_execute_calldata())
            .await
    }

    /// Native balance of the smart account on the connected chain, in wei.
    pub async fn balance(&self) -> Result<U256> {
        let reader = self.reader(&self.chain)?;
        let address = self.resolve_with(reader.as_ref()).await?.address;
        reader
            .get_balance(address)
            .await
            .map_err(|e| ClientError::rpc(PipelineStep::Balance, e))
    }

    /// `token` balance of the smart account on `chain`, deriving the address on that chain.
    async fn token_balance(&self, chain: &ChainConfig, token: Token) -> Result<f64> {
        let reader = self.reader(chain)?;
        let owner = self.resolve_with(reader.as_ref()).await?.address;
        let token_address = self.registry.token_address(&chain.name, token)?;
        let balance = read_contract(
            reader.as_ref(),
            token_address,
            &IERC20::balanceOfCall { account: owner },
            PipelineStep::Balance,
        )
        .await?
        .balance;
        Ok(to_display_units(balance, BALANCE_DECIMALS)?)
    }

    /// `token` balance of the smart account across every registry chain. Chains are queried
    /// concurrently and a failing chain only marks its own entry.
    pub async fn unified_balance(&self, token: Token) -> Result<UnifiedBalance> {
        let queries = self.registry.chains().iter().map(|chain| async move {
            let outcome =
                tokio::time::timeout(self.balance_timeout, self.token_balance(chain, token)).await;

            let (balance, error) = match outcome {
                Ok(Ok(balance)) => (Some(balance), None),
                Ok(Err(err)) => {
                    tracing::warn!(chain = %chain.name, "balance query failed: {err}");
                    (None, Some(err.to_string()))
                }
                Err(_) => {
                    tracing::warn!(chain = %chain.name, "balance query timed out");
                    (
                        None,
                        Some(format!("timed out after {:?}", self.balance_timeout)),
                    )
                }
            };

            ChainBalance {
                chain: chain.name.clone(),
                chain_id: chain.chain_id,
                balance,
                error,
            }
        });
        let fragmented = join_all(queries).await;

        let balance = fragmented.iter().filter_map(|c| c.balance).sum();
        let chain_balance = fragmented
            .iter()
            .find(|c| c.chain_id == self.chain.chain_id)
            .and_then(|c| c.balance)
            .unwrap_or_default();

        Ok(UnifiedBalance {
            balance,
            fragmented,
            chain_balance,
        })
    }

    pub fn intent(&self) -> IntentClient<'_, S> {
        IntentClient::new(self)
    }
}
