//! ERC-4337 bundler and paymaster JSON-RPC.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bond_primitives::abi::UserOperation;
use bond_primitives::alloy::primitives::{Address, B256};
use bond_primitives::user_operation::{GasPriceQuote, Sponsorship, UserOperationReceipt};
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use url::Url;

#[derive(Debug, Clone, Error)]
pub enum BundlerError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("json-rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("failed to decode response: {0}")]
    Decode(String),
}

pub type BundlerResult<T> = core::result::Result<T, BundlerError>;

/// Methods of the bundler/paymaster service used while building and tracking operations.
#[async_trait]
pub trait BundlerApi: Send + Sync {
    /// `pimlico_getUserOperationGasPrice`
    async fn user_operation_gas_price(&self) -> BundlerResult<GasPriceQuote>;

    /// `pm_sponsorUserOperation`
    async fn sponsor_user_operation(
        &self,
        op: &UserOperation,
        entrypoint: Address,
    ) -> BundlerResult<Sponsorship>;

    /// `eth_sendUserOperation`, returns the operation hash
    async fn send_user_operation(
        &self,
        op: &UserOperation,
        entrypoint: Address,
    ) -> BundlerResult<B256>;

    /// `eth_getUserOperationReceipt`, `None` while the operation is pending
    async fn user_operation_receipt(
        &self,
        op_hash: B256,
    ) -> BundlerResult<Option<UserOperationReceipt>>;
}

#[derive(Debug, Deserialize)]
struct JsonRpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<R> {
    #[serde(default = "Option::default")]
    result: Option<R>,
    #[serde(default)]
    error: Option<JsonRpcErrorObject>,
}

/// JSON-RPC 2.0 client for a bundler endpoint.
pub struct BundlerClient {
    client: Client,
    url: Url,
    next_id: AtomicU64,
}

impl BundlerClient {
    pub fn new(url: Url) -> BundlerResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| BundlerError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            url,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Issue `method`, returning the raw `result` (`None` for a json `null`).
    async fn request<P, R>(&self, method: &str, params: P) -> BundlerResult<Option<R>>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        tracing::debug!(method, id, "bundler request: {}", body);

        let response = self
            .client
            .post(self.url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| BundlerError::Transport(e.to_string()))?
            .error_for_status()
            .map_err(|e| BundlerError::Transport(e.to_string()))?;

        let response: JsonRpcResponse<R> = response
            .json()
            .await
            .map_err(|e| BundlerError::Decode(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(BundlerError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(response.result)
    }

    async fn request_required<P, R>(&self, method: &str, params: P) -> BundlerResult<R>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        self.request(method, params)
            .await?
            .ok_or_else(|| BundlerError::Decode(format!("{method} returned no result")))
    }
}

#[async_trait]
impl BundlerApi for BundlerClient {
    async fn user_operation_gas_price(&self) -> BundlerResult<GasPriceQuote> {
        self.request_required("pimlico_getUserOperationGasPrice", json!([]))
            .await
    }

    async fn sponsor_user_operation(
        &self,
        op: &UserOperation,
        entrypoint: Address,
    ) -> BundlerResult<Sponsorship> {
        self.request_required("pm_sponsorUserOperation", (op, entrypoint))
            .await
    }

    async fn send_user_operation(
        &self,
        op: &UserOperation,
        entrypoint: Address,
    ) -> BundlerResult<B256> {
        self.request_required("eth_sendUserOperation", (op, entrypoint))
            .await
    }

    async fn user_operation_receipt(
        &self,
        op_hash: B256,
    ) -> BundlerResult<Option<UserOperationReceipt>> {
        self.request("eth_getUserOperationReceipt", [op_hash]).await
    }
}
