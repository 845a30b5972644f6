use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{keccak256, Address, Bytes, ChainId, PrimitiveSignature, B256, U256};
use alloy::signers::Signer;
use alloy::sol_types::{SolCall, SolError, SolValue};
use alloy::transports::{TransportErrorKind, TransportResult};
use async_trait::async_trait;
use bond_client::bundler::{BundlerApi, BundlerError, BundlerResult};
use bond_client::{CallOutcome, ChainConnector, ChainReader, Result};
use bond_primitives::abi::{IEntryPoint, IProtocol, UserOperation, IERC20};
use bond_primitives::chains::ChainConfig;
use bond_primitives::user_operation::{GasPriceQuote, Sponsorship, UserOperationReceipt};

/// Shared, ordered record of every network interaction.
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// What `getUserOpHash` returns for `op`: keccak of the operation with the signature cleared.
pub fn user_op_hash(op: &UserOperation) -> B256 {
    let mut op = op.clone();
    op.signature = Bytes::new();
    keccak256(op.abi_encode())
}

/// In-memory chain answering the contract calls the client makes.
pub struct MockChainReader {
    pub account: Address,
    pub deployed: bool,
    pub probe_fails: bool,
    pub derivation_reverts: bool,
    pub derivation_payload: Option<Bytes>,
    pub entrypoint_nonce: U256,
    pub nonce_fails: bool,
    pub protocol_nonce: U256,
    pub fees: U256,
    pub decimals: u8,
    /// `None` makes `balanceOf` fail at the transport level
    pub token_balance: Option<U256>,
    /// `balanceOf` answers only after this long
    pub balance_delay: Option<Duration>,
    pub native_balance: U256,
    /// `from` of every protocol contract read
    pub protocol_callers: Mutex<Vec<Option<Address>>>,
    pub events: EventLog,
}

impl MockChainReader {
    pub fn new(account: Address, events: EventLog) -> Self {
        Self {
            account,
            deployed: false,
            probe_fails: false,
            derivation_reverts: true,
            derivation_payload: None,
            entrypoint_nonce: U256::ZERO,
            nonce_fails: false,
            protocol_nonce: U256::ZERO,
            fees: U256::ZERO,
            decimals: 6,
            token_balance: Some(U256::ZERO),
            balance_delay: None,
            native_balance: U256::ZERO,
            protocol_callers: Mutex::new(Vec::new()),
            events,
        }
    }

    fn log(&self, event: &str) {
        self.events.lock().unwrap().push(event.to_string());
    }
}

#[async_trait]
impl ChainReader for MockChainReader {
    async fn call(
        &self,
        from: Option<Address>,
        _to: Address,
        input: Bytes,
    ) -> TransportResult<CallOutcome> {
        let selector: [u8; 4] = input[..4].try_into().unwrap();

        match selector {
            IEntryPoint::getSenderAddressCall::SELECTOR => {
                self.log("getSenderAddress");
                if !self.derivation_reverts {
                    return Ok(CallOutcome::Success(Bytes::new()));
                }
                let payload = self.derivation_payload.clone().unwrap_or_else(|| {
                    IEntryPoint::SenderAddressResult {
                        sender: self.account,
                    }
                    .abi_encode()
                    .into()
                });
                Ok(CallOutcome::Revert(payload))
            }
            IEntryPoint::getNonceCall::SELECTOR => {
                self.log("getNonce");
                if self.nonce_fails {
                    return Err(TransportErrorKind::custom_str("nonce unavailable"));
                }
                Ok(CallOutcome::Success(self.entrypoint_nonce.abi_encode().into()))
            }
            IEntryPoint::getUserOpHashCall::SELECTOR => {
                self.log("getUserOpHash");
                let call = IEntryPoint::getUserOpHashCall::abi_decode(&input, true).unwrap();
                Ok(CallOutcome::Success(
                    user_op_hash(&call.userOp).abi_encode().into(),
                ))
            }
            IProtocol::getNonceCall::SELECTOR => {
                self.log("protocolNonce");
                self.protocol_callers.lock().unwrap().push(from);
                Ok(CallOutcome::Success(self.protocol_nonce.abi_encode().into()))
            }
            IProtocol::getFeesCall::SELECTOR => {
                self.log("getFees");
                self.protocol_callers.lock().unwrap().push(from);
                Ok(CallOutcome::Success(self.fees.abi_encode().into()))
            }
            IERC20::decimalsCall::SELECTOR => {
                self.log("decimals");
                Ok(CallOutcome::Success(
                    U256::from(self.decimals).abi_encode().into(),
                ))
            }
            IERC20::balanceOfCall::SELECTOR => {
                self.log("balanceOf");
                if let Some(delay) = self.balance_delay {
                    tokio::time::sleep(delay).await;
                }
                match self.token_balance {
                    Some(balance) => Ok(CallOutcome::Success(balance.abi_encode().into())),
                    None => Err(TransportErrorKind::custom_str("connection refused")),
                }
            }
            _ => Err(TransportErrorKind::custom_str("unexpected call")),
        }
    }

    async fn get_code(&self, _address: Address) -> TransportResult<Bytes> {
        self.log("getCode");
        if self.probe_fails {
            return Err(TransportErrorKind::custom_str("probe failed"));
        }
        if self.deployed {
            Ok(Bytes::from_static(&[0x60, 0x80]))
        } else {
            Ok(Bytes::new())
        }
    }

    async fn get_balance(&self, _address: Address) -> TransportResult<U256> {
        self.log("getBalance");
        Ok(self.native_balance)
    }
}

/// In-memory bundler. Setting one of the `*_error` fields makes that method fail with it.
pub struct MockBundler {
    pub gas_price: GasPriceQuote,
    pub gas_price_error: Option<BundlerError>,
    pub sponsorship: Sponsorship,
    pub sponsor_error: Option<BundlerError>,
    pub op_hash: B256,
    pub send_error: Option<BundlerError>,
    pub receipts: Mutex<VecDeque<BundlerResult<Option<UserOperationReceipt>>>>,
    pub sponsored: Mutex<Vec<UserOperation>>,
    pub sent: Mutex<Vec<UserOperation>>,
    pub receipt_queries: Mutex<u32>,
    pub events: EventLog,
}

impl MockBundler {
    pub fn new(events: EventLog) -> Self {
        Self {
            gas_price: gas_price_quote(),
            gas_price_error: None,
            sponsorship: sponsorship(),
            sponsor_error: None,
            op_hash: B256::repeat_byte(0x42),
            send_error: None,
            receipts: Mutex::new(VecDeque::new()),
            sponsored: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            receipt_queries: Mutex::new(0),
            events,
        }
    }

    fn log(&self, event: &str) {
        self.events.lock().unwrap().push(event.to_string());
    }

    pub fn sent(&self) -> Vec<UserOperation> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl BundlerApi for MockBundler {
    async fn user_operation_gas_price(&self) -> BundlerResult<GasPriceQuote> {
        self.log("gasPrice");
        match &self.gas_price_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.gas_price.clone()),
        }
    }

    async fn sponsor_user_operation(
        &self,
        op: &UserOperation,
        _entrypoint: Address,
    ) -> BundlerResult<Sponsorship> {
        self.log("sponsor");
        self.sponsored.lock().unwrap().push(op.clone());
        match &self.sponsor_error {
            Some(err) => Err(err.clone()),
            None => Ok(self.sponsorship.clone()),
        }
    }

    async fn send_user_operation(
        &self,
        op: &UserOperation,
        _entrypoint: Address,
    ) -> BundlerResult<B256> {
        self.log("send");
        if let Some(err) = &self.send_error {
            return Err(err.clone());
        }
        self.sent.lock().unwrap().push(op.clone());
        Ok(self.op_hash)
    }

    async fn user_operation_receipt(
        &self,
        _op_hash: B256,
    ) -> BundlerResult<Option<UserOperationReceipt>> {
        *self.receipt_queries.lock().unwrap() += 1;
        self.receipts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(None))
    }
}

/// Connector handing out pre-built mocks keyed by chain id.
#[derive(Default)]
pub struct MockConnector {
    pub readers: HashMap<u64, Arc<MockChainReader>>,
    pub bundlers: HashMap<u64, Arc<MockBundler>>,
}

impl ChainConnector for MockConnector {
    fn reader(&self, chain: &ChainConfig) -> Result<Arc<dyn ChainReader>> {
        let reader = self.readers.get(&chain.chain_id).cloned().ok_or_else(|| {
            bond_client::ClientError::ConfigError(format!("no reader for {}", chain.name))
        })?;
        Ok(reader)
    }

    fn bundler(&self, chain: &ChainConfig) -> Result<Arc<dyn BundlerApi>> {
        let bundler = self.bundlers.get(&chain.chain_id).cloned().ok_or_else(|| {
            bond_client::ClientError::ConfigError(format!("no bundler for {}", chain.name))
        })?;
        Ok(bundler)
    }
}

/// Owner key whose signing backend is offline.
#[derive(Debug, Clone, Copy)]
pub struct OfflineSigner {
    pub address: Address,
}

#[async_trait]
impl Signer for OfflineSigner {
    async fn sign_hash(&self, _hash: &B256) -> alloy::signers::Result<PrimitiveSignature> {
        Err(alloy::signers::Error::other("signing backend offline"))
    }

    fn address(&self) -> Address {
        self.address
    }

    fn chain_id(&self) -> Option<ChainId> {
        None
    }

    fn set_chain_id(&mut self, _chain_id: Option<ChainId>) {}
}

/// JSON-RPC error: the bundler looked at the request and said no.
pub fn rejected(message: &str) -> BundlerError {
    BundlerError::Rpc {
        code: -32500,
        message: message.into(),
    }
}

/// The bundler endpoint could not be reached.
pub fn unreachable_endpoint() -> BundlerError {
    BundlerError::Transport("connection refused".into())
}

pub fn gas_price_quote() -> GasPriceQuote {
    let tier = |fee: u64, tip: u64| bond_primitives::user_operation::GasPriceTier {
        max_fee_per_gas: U256::from(fee),
        max_priority_fee_per_gas: U256::from(tip),
    };
    GasPriceQuote {
        slow: tier(10, 1),
        standard: tier(20, 2),
        fast: tier(30, 3),
    }
}

pub fn sponsorship() -> Sponsorship {
    Sponsorship {
        paymaster_and_data: Bytes::from_static(&[0xaa; 20]),
        pre_verification_gas: U256::from(50_000u64),
        verification_gas_limit: U256::from(150_000u64),
        call_gas_limit: U256::from(80_000u64),
    }
}

pub fn receipt(op_hash: B256, sender: Address) -> UserOperationReceipt {
    UserOperationReceipt {
        user_op_hash: op_hash,
        sender,
        nonce: U256::ZERO,
        success: true,
        actual_gas_cost: U256::from(1_000u64),
        actual_gas_used: U256::from(100u64),
        paymaster: None,
        receipt: serde_json::json!({ "status": "0x1" }),
    }
}
