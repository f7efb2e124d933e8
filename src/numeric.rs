// src/numeric.rs
//
// Decimal scaling utilities for converting raw token amounts (base units) into
// human-scale decimals with correct per-token decimal handling.
//
// Everything here is arbitrary precision: pool reserves accumulate well past
// 60 significant digits over the life of a pair, so float or 128-bit decimal
// types are not an option.

use bigdecimal::{BigDecimal, Zero};
use ethers::types::{Address, H256, U256};
use num_bigint::BigInt;
use std::str::FromStr;

/// 10^decimals as an arbitrary-precision decimal.
pub fn exponent_to_big_decimal(decimals: u32) -> BigDecimal {
    // scale is negative: unscaled 1 shifted left by `decimals` digits
    BigDecimal::new(BigInt::from(1), -(decimals as i64))
}

/// Scale a raw base-unit amount down by the token's decimals.
///
/// `decimals == 0` short-circuits to a plain integer-to-decimal conversion.
pub fn convert_token_to_decimal(amount: U256, decimals: u32) -> BigDecimal {
    let unscaled = u256_to_big_int(amount);
    if decimals == 0 {
        return BigDecimal::from(unscaled);
    }
    BigDecimal::new(unscaled, decimals as i64)
}

/// Ratio with division-by-zero defined as zero.
///
/// Reserve ratios (token prices) hit the zero denominator case on every
/// freshly created pair, so this is an expected value, not an error.
pub fn safe_div(numerator: &BigDecimal, denominator: &BigDecimal) -> BigDecimal {
    if denominator.is_zero() {
        BigDecimal::zero()
    } else {
        numerator / denominator
    }
}

pub fn u256_to_big_int(value: U256) -> BigInt {
    // U256 renders in decimal; BigInt parses it exactly
    BigInt::from_str(&value.to_string()).expect("U256 decimal rendering is always a valid BigInt")
}

/// Canonical entity key for an address: full lowercase 0x-prefixed hex.
pub fn address_id(address: Address) -> String {
    format!("{:?}", address)
}

/// Canonical entity key for a transaction hash.
pub fn tx_id(hash: H256) -> String {
    format!("{:?}", hash)
}
