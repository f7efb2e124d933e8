// src/metadata.rs
//
// Token metadata resolution with graceful degradation. WKLC and KSWAP are
// hard-coded so the two tokens every deployment touches never cost a call.
// For everything else: try the string-typed accessor, fall back to bytes32,
// and settle for "unknown" if both fail. Decimals have no fallback; an
// unresolvable decimals call makes the token unusable (its amounts could not
// be scaled) and the caller must skip creating it.

use crate::chain::Erc20Source;
use crate::settings::Settings;
use ethers::types::Address;
use tracing::warn;

const UNKNOWN: &str = "unknown";

pub fn fetch_token_symbol<C: Erc20Source>(chain: &C, settings: &Settings, token: Address) -> String {
    if token == settings.wklc_address {
        return "WKLC".to_string();
    }
    if token == settings.kswap_address {
        return "KSWAP".to_string();
    }

    match chain.symbol(token) {
        Ok(symbol) => symbol,
        Err(_) => match chain.symbol_bytes32(token) {
            Ok(raw) if !is_null_bytes_value(&raw) => bytes32_to_string(&raw),
            _ => {
                warn!(token = %crate::numeric::address_id(token), "symbol unresolvable, using fallback");
                UNKNOWN.to_string()
            }
        },
    }
}

pub fn fetch_token_name<C: Erc20Source>(chain: &C, settings: &Settings, token: Address) -> String {
    if token == settings.wklc_address {
        return "WKLC".to_string();
    }
    if token == settings.kswap_address {
        return "KSWAP".to_string();
    }

    match chain.name(token) {
        Ok(name) => name,
        Err(_) => match chain.name_bytes32(token) {
            Ok(raw) if !is_null_bytes_value(&raw) => bytes32_to_string(&raw),
            _ => {
                warn!(token = %crate::numeric::address_id(token), "name unresolvable, using fallback");
                UNKNOWN.to_string()
            }
        },
    }
}

/// `None` means decimals are unresolvable, which is fatal for the token:
/// without decimals no amount touching it can ever be scaled correctly.
pub fn fetch_token_decimals<C: Erc20Source>(
    chain: &C,
    settings: &Settings,
    token: Address,
) -> Option<u32> {
    if token == settings.wklc_address || token == settings.kswap_address {
        return Some(18);
    }
    chain.decimals(token).ok()
}

/// Sentinel returned by broken bytes32 accessors: all zero, or zero with a
/// trailing 0x01 marker.
fn is_null_bytes_value(raw: &[u8; 32]) -> bool {
    let (head, last) = raw.split_at(31);
    head.iter().all(|b| *b == 0) && (last[0] == 0 || last[0] == 1)
}

fn bytes32_to_string(raw: &[u8; 32]) -> String {
    let end = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}
