use std::fmt;

use bond_primitives::validation::ValidationResult;
use bond_primitives::PrimitivesError;
use thiserror::Error;

/// Network step that failed, named in `RpcRequestError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStep {
    AddressDerivation,
    NonceFetch,
    FeeQuote,
    Sponsorship,
    UserOpHash,
    Submission,
    ProtocolNonce,
    IntentFees,
    TokenDecimals,
    Balance,
}

impl fmt::Display for PipelineStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            PipelineStep::AddressDerivation => "address derivation",
            PipelineStep::NonceFetch => "entrypoint nonce fetch",
            PipelineStep::FeeQuote => "gas price quote",
            PipelineStep::Sponsorship => "paymaster sponsorship",
            PipelineStep::UserOpHash => "user operation hash",
            PipelineStep::Submission => "user operation submission",
            PipelineStep::ProtocolNonce => "protocol nonce fetch",
            PipelineStep::IntentFees => "intent fee quote",
            PipelineStep::TokenDecimals => "token decimals",
            PipelineStep::Balance => "balance query",
        };
        f.write_str(step)
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),
    #[error("Failed rpc request during {step}: {message}")]
    RpcRequestError { step: PipelineStep, message: String },
    #[error("Gas price quote unavailable: {0}")]
    FeeQuoteUnavailable(String),
    #[error("Sponsorship denied: {0}")]
    SponsorshipDenied(String),
    #[error("Failed user operation signing: {0}")]
    SigningError(String),
    #[error("Failed to submit user operation: {0}")]
    SubmissionFailed(String),
    #[error("Failed receipt query: {0}")]
    ReceiptQueryError(String),
    #[error("Intent failed validation: {0:?}")]
    ValidationFailed(ValidationResult),
    #[error("Config error: {0}")]
    ConfigError(String),
    #[error("Primitives error: {0}")]
    PrimitivesError(#[from] PrimitivesError),
}

impl ClientError {
    pub(crate) fn rpc(step: PipelineStep, err: impl fmt::Display) -> Self {
        ClientError::RpcRequestError {
            step,
            message: err.to_string(),
        }
    }
}

pub type Result<T> = core::result::Result<T, ClientError>;
