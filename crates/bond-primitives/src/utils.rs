use alloy::primitives::{
    hex,
    utils::{format_units, parse_units, ParseUnits},
    Bytes, U256,
};
use lazy_static::lazy_static;

use crate::{PrimitivesError, Result};

/// Placeholder signature with the length and shape of a real ECDSA signature, used only so
/// the bundler can estimate the size of an operation before it is signed.
pub const DUMMY_SIGNATURE_BYTES: [u8; 65] = hex!(
    "fffffffffffffffffffffffffffffff0000000000000000000000000000000007aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1c"
);

lazy_static! {
    pub static ref DUMMY_SIGNATURE: Bytes = dummy_signature(1);
}

/// Dummy signature for an account with `signers` owners (65 bytes each).
#[must_use]
pub fn dummy_signature(signers: usize) -> Bytes {
    DUMMY_SIGNATURE_BYTES.repeat(signers).into()
}

/// Decimal string (`"1.5"`) to base units of a token with `decimals`.
pub fn parse_token_units(amount: &str, decimals: u8) -> Result<U256> {
    let parsed = parse_units(amount, decimals)
        .map_err(|e| PrimitivesError::UnitsError(format!("invalid amount {amount}: {e}")))?;
    match parsed {
        ParseUnits::U256(value) => Ok(value),
        ParseUnits::I256(value) if value.is_negative() => Err(PrimitivesError::UnitsError(
            format!("amount {amount} must not be negative"),
        )),
        ParseUnits::I256(value) => Ok(value.into_raw()),
    }
}

/// Base units to a human value, e.g. for balance display.
pub fn to_display_units(amount: U256, decimals: u8) -> Result<f64> {
    let formatted = format_units(amount, decimals)
        .map_err(|e| PrimitivesError::UnitsError(e.to_string()))?;
    formatted
        .parse::<f64>()
        .map_err(|e| PrimitivesError::UnitsError(format!("{formatted}: {e}")))
}
