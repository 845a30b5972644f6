//! Structural validation of intents before they are encoded and submitted.
//!
//! Validation never fails: every violated rule is collected into a [`ValidationResult`] so
//! callers can report all problems at once.

use std::fmt;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::chains::ChainRegistry;
use crate::intents::IntentData;
use crate::{PrimitivesError, Result};

/// 30 minutes
pub const DEFAULT_MIN_EXPIRY_WINDOW: u64 = 30 * 60;
/// 2 hours
pub const DEFAULT_MAX_EXPIRY_WINDOW: u64 = 2 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentValidationConfig {
    /// seconds after `now` before which an intent may not expire
    pub min_expiry_window: u64,
    /// seconds after `now` after which an intent may not expire
    pub max_expiry_window: u64,
    pub supported_chain_ids: Vec<u64>,
}

impl Default for IntentValidationConfig {
    fn default() -> Self {
        Self {
            min_expiry_window: DEFAULT_MIN_EXPIRY_WINDOW,
            max_expiry_window: DEFAULT_MAX_EXPIRY_WINDOW,
            supported_chain_ids: vec![11_155_111, 80_002, 421_614, 43_113],
        }
    }
}

impl IntentValidationConfig {
    /// default windows, chains taken from `registry`
    pub fn from_registry(registry: &ChainRegistry) -> Self {
        Self {
            supported_chain_ids: registry.supported_chain_ids(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Collapse into a `Result`, joining every violation into one `ValidationError`.
    pub fn into_result(self) -> Result<()> {
        if self.is_valid {
            return Ok(());
        }
        let joined = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(PrimitivesError::ValidationError(joined))
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntentValidator {
    config: IntentValidationConfig,
}

impl IntentValidator {
    pub fn new(config: IntentValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &IntentValidationConfig {
        &self.config
    }

    /// Check `intent` against every rule, `now` being the current unix time in seconds.
    pub fn validate(&self, intent: &IntentData, now: u64) -> ValidationResult {
        let mut errors = Vec::new();

        self.validate_sender(intent, &mut errors);
        self.validate_chains(intent, &mut errors);
        self.validate_amounts(intent, &mut errors);
        self.validate_expiry(intent, now, &mut errors);
        self.validate_dst_datas(intent, &mut errors);

        ValidationResult::from_errors(errors)
    }

    fn validate_sender(&self, intent: &IntentData, errors: &mut Vec<ValidationError>) {
        if intent.sender == Address::ZERO {
            errors.push(ValidationError::new(
                "sender",
                "sender must be a valid non-zero address",
            ));
        }
    }

    fn validate_chains(&self, intent: &IntentData, errors: &mut Vec<ValidationError>) {
        let supported = &self.config.supported_chain_ids;
        let listing = supported
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");

        if !supported.contains(&intent.init_chain_id) {
            errors.push(ValidationError::new(
                "initChainId",
                format!("initChainId must be one of supported chains: {listing}"),
            ));
        }
        if !supported.contains(&intent.dst_chain_id) {
            errors.push(ValidationError::new(
                "dstChainId",
                format!("dstChainId must be one of supported chains: {listing}"),
            ));
        }
        for (i, chain_id) in intent.src_chain_ids.iter().enumerate() {
            if !supported.contains(chain_id) {
                errors.push(ValidationError::new(
                    format!("srcChainIds[{i}]"),
                    format!("srcChainIds[{i}] must be one of supported chains: {listing}"),
                ));
            }
        }
    }

    fn validate_amounts(&self, intent: &IntentData, errors: &mut Vec<ValidationError>) {
        if intent.src_chain_ids.len() != intent.src_amounts.len() {
            errors.push(ValidationError::new(
                "srcChainIds/srcAmounts",
                "srcChainIds and srcAmounts must have equal length",
            ));
        }
        for (i, amount) in intent.src_amounts.iter().enumerate() {
            if *amount == U256::ZERO {
                errors.push(ValidationError::new(
                    format!("srcAmounts[{i}]"),
                    format!("srcAmounts[{i}] must be greater than 0"),
                ));
            }
        }
    }

    // bounds are inclusive
    fn validate_expiry(&self, intent: &IntentData, now: u64, errors: &mut Vec<ValidationError>) {
        let min = now.saturating_add(self.config.min_expiry_window);
        let max = now.saturating_add(self.config.max_expiry_window);

        if intent.expires < min {
            errors.push(ValidationError::new(
                "expires",
                format!(
                    "expires must be at least {}s in the future",
                    self.config.min_expiry_window
                ),
            ));
        } else if intent.expires > max {
            errors.push(ValidationError::new(
                "expires",
                format!(
                    "expires must be at most {}s in the future",
                    self.config.max_expiry_window
                ),
            ));
        }
    }

    fn validate_dst_datas(&self, intent: &IntentData, errors: &mut Vec<ValidationError>) {
        if intent.dst_datas.is_empty() {
            errors.push(ValidationError::new(
                "dstDatas",
                "dstDatas cannot be empty",
            ));
        }
        for (i, dst) in intent.dst_datas.iter().enumerate() {
            if dst.target == Address::ZERO {
                errors.push(ValidationError::new(
                    format!("dstDatas[{i}].target"),
                    format!("dstDatas[{i}].target must be a valid non-zero address"),
                ));
            }
        }
    }
}
