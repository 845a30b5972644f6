//! Client for Bond smart accounts: ERC-4337 accounts that are addressable on every supported
//! chain and fund cross-chain intents from one unified balance.

pub mod account;
pub mod bundler;
pub mod error;
pub mod intent;
pub mod network;
pub mod operation;
pub mod receipt;
pub mod resolver;

pub use account::{AccountStatus, Call, ChainBalance, SmartAccount, UnifiedBalance};
pub use error::{ClientError, PipelineStep, Result};
pub use intent::{
    DirectIntentRequest, DirectSource, IntentClient, IntentSource, PreparedIntent, RawIntentRequest,
};
pub use network::{CallOutcome, ChainConnector, ChainReader, HttpConnector, RpcChainReader};
pub use receipt::{ReceiptPoller, ReceiptStatus};
