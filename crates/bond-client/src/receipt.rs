use std::time::Duration;

use bond_primitives::alloy::primitives::B256;
use bond_primitives::user_operation::UserOperationReceipt;

use crate::bundler::BundlerApi;
use crate::error::{ClientError, Result};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptStatus {
    Found(Box<UserOperationReceipt>),
    /// attempts exhausted while the operation was still pending
    NotFound,
}

/// Polls `eth_getUserOperationReceipt` until the receipt shows up or attempts run out.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptPoller {
    max_attempts: u32,
    interval: Duration,
}

impl Default for ReceiptPoller {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl ReceiptPoller {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Single query, no retry.
    pub async fn fetch(
        &self,
        bundler: &dyn BundlerApi,
        op_hash: B256,
    ) -> Result<Option<UserOperationReceipt>> {
        bundler
            .user_operation_receipt(op_hash)
            .await
            .map_err(|e| ClientError::ReceiptQueryError(e.to_string()))
    }

    /// Transient query errors are retried like a pending receipt.
    pub async fn poll(&self, bundler: &dyn BundlerApi, op_hash: B256) -> ReceiptStatus {
        for attempt in 1..=self.max_attempts {
            tracing::info!(%op_hash, "receipt attempt {}/{}", attempt, self.max_attempts);

            match self.fetch(bundler, op_hash).await {
                Ok(Some(receipt)) => return ReceiptStatus::Found(Box::new(receipt)),
                Ok(None) => {}
                Err(err) => tracing::warn!(%op_hash, attempt, "receipt query failed: {err}"),
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        tracing::info!(%op_hash, "no receipt after {} attempts", self.max_attempts);
        ReceiptStatus::NotFound
    }
}
