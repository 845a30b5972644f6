use bond_primitives::abi::IEntryPoint;
use bond_primitives::alloy::primitives::{Address, Bytes, B256, U192};
use bond_primitives::alloy::signers::Signer;
use bond_primitives::user_operation::{DraftUserOperation, SignedUserOperation};

use crate::bundler::{BundlerApi, BundlerError};
use crate::error::{ClientError, PipelineStep, Result};
use crate::network::{read_contract, ChainReader};

/// Assembles, signs and submits EntryPoint v0.6 user operations.
///
/// `build` runs the pipeline in a fixed order:
/// 1. `EntryPoint.getNonce(sender, 0)`
/// 2. draft with a dummy signature
/// 3. `fast` gas price tier from the bundler
/// 4. paymaster sponsorship (gas limits + `paymasterAndData`)
/// 5. `EntryPoint.getUserOpHash` over the sponsored operation
/// 6. EIP-191 signature of the hash by the owner
///
/// Nothing is sent to the bundler for submission until `submit`.
#[derive(Debug, Clone, Copy)]
pub struct OperationBuilder {
    entrypoint: Address,
}

impl OperationBuilder {
    pub fn new(entrypoint: Address) -> Self {
        Self { entrypoint }
    }

    pub async fn build<S>(
        &self,
        reader: &dyn ChainReader,
        bundler: &dyn BundlerApi,
        sender: Address,
        init_code: Bytes,
        call_data: Bytes,
        signer: &S,
    ) -> Result<SignedUserOperation>
    where
        S: Signer + Send + Sync,
    {
        let nonce = read_contract(
            reader,
            self.entrypoint,
            &IEntryPoint::getNonceCall {
                sender,
                key: U192::ZERO,
            },
            PipelineStep::NonceFetch,
        )
        .await?
        .nonce;
        tracing::info!(%sender, %nonce, "fetched entrypoint nonce");

        let draft = DraftUserOperation::new(sender, nonce, init_code, call_data);

        let quote = bundler
            .user_operation_gas_price()
            .await
            .map_err(|e| {
                bundler_error(PipelineStep::FeeQuote, e, ClientError::FeeQuoteUnavailable)
            })?;
        let draft = draft.with_gas_price(&quote.fast);
        tracing::info!(
            max_fee_per_gas = %quote.fast.max_fee_per_gas,
            max_priority_fee_per_gas = %quote.fast.max_priority_fee_per_gas,
            "applied gas price"
        );

        let sponsorship = bundler
            .sponsor_user_operation(draft.as_user_operation(), self.entrypoint)
            .await
            .map_err(|e| {
                bundler_error(PipelineStep::Sponsorship, e, ClientError::SponsorshipDenied)
            })?;
        tracing::debug!("sponsorship: {:?}", sponsorship);
        let sponsored = draft.sponsor(sponsorship);

        let hash = read_contract(
            reader,
            self.entrypoint,
            &IEntryPoint::getUserOpHashCall {
                userOp: sponsored.as_user_operation().clone(),
            },
            PipelineStep::UserOpHash,
        )
        .await?
        .userOpHash;
        tracing::info!(%hash, "computed user operation hash");

        let signature = signer
            .sign_message(hash.as_slice())
            .await
            .map_err(|e| ClientError::SigningError(e.to_string()))?;

        Ok(sponsored.into_signed(Bytes::copy_from_slice(&signature.as_bytes()), hash))
    }

    /// Hand a signed operation to the bundler, returning the bundler's operation hash.
    pub async fn submit(
        &self,
        bundler: &dyn BundlerApi,
        op: SignedUserOperation,
    ) -> Result<B256> {
        let op_hash = bundler
            .send_user_operation(op.user_operation(), self.entrypoint)
            .await
            .map_err(|e| {
                bundler_error(PipelineStep::Submission, e, ClientError::SubmissionFailed)
            })?;
        tracing::info!(%op_hash, sender = %op.user_operation().sender, "user operation submitted");
        Ok(op_hash)
    }
}

/// A JSON-RPC error is the bundler answering no. Anything else means it could not be reached
/// or understood.
fn bundler_error(
    step: PipelineStep,
    err: BundlerError,
    rejected: fn(String) -> ClientError,
) -> ClientError {
    match err {
        BundlerError::Rpc { .. } => rejected(err.to_string()),
        BundlerError::Transport(_) | BundlerError::Decode(_) => ClientError::rpc(step, err),
    }
}
