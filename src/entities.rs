// src/entities.rs
//
// The derived entity graph. Every entity is identified by a stable string key
// (lowercase 0x hex for addresses and transaction hashes, bucket-suffixed ids
// for the time rollups). Monetary fields are arbitrary-precision decimals;
// raw LP-token supplies stay in base units as U256.

use bigdecimal::BigDecimal;
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

/// ERC20 token touched by at least one pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u32,
    pub total_supply: U256,
    pub trade_volume: BigDecimal,
    pub trade_volume_usd: BigDecimal,
    pub untracked_volume_usd: BigDecimal,
    pub total_liquidity: BigDecimal,
    pub tx_count: u64,
    /// Price of one token expressed in WKLC, derived via the whitelist.
    pub derived_klc: BigDecimal,
    pub derived_usd: BigDecimal,
}

impl Token {
    pub fn new(id: String, symbol: String, name: String, decimals: u32) -> Self {
        Self {
            id,
            symbol,
            name,
            decimals,
            total_supply: U256::zero(),
            trade_volume: BigDecimal::default(),
            trade_volume_usd: BigDecimal::default(),
            untracked_volume_usd: BigDecimal::default(),
            total_liquidity: BigDecimal::default(),
            tx_count: 0,
            derived_klc: BigDecimal::default(),
            derived_usd: BigDecimal::default(),
        }
    }
}

/// Two-token liquidity pool. token0/token1 are immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pair {
    pub id: String,
    pub token0: String,
    pub token1: String,
    pub reserve0: BigDecimal,
    pub reserve1: BigDecimal,
    /// LP token supply in base units.
    pub total_supply: U256,
    pub reserve_klc: BigDecimal,
    pub reserve_usd: BigDecimal,
    /// Whitelist-derived share of the reserves, in WKLC.
    pub tracked_reserve_klc: BigDecimal,
    /// reserve0 / reserve1
    pub token0_price: BigDecimal,
    /// reserve1 / reserve0
    pub token1_price: BigDecimal,
    pub volume_token0: BigDecimal,
    pub volume_token1: BigDecimal,
    pub volume_usd: BigDecimal,
    pub untracked_volume_usd: BigDecimal,
    pub tx_count: u64,
    pub created_at_timestamp: u64,
    pub created_at_block_number: u64,
    pub liquidity_provider_count: u64,
}

impl Pair {
    pub fn new(id: String, token0: String, token1: String, timestamp: u64, block: u64) -> Self {
        Self {
            id,
            token0,
            token1,
            reserve0: BigDecimal::default(),
            reserve1: BigDecimal::default(),
            total_supply: U256::zero(),
            reserve_klc: BigDecimal::default(),
            reserve_usd: BigDecimal::default(),
            tracked_reserve_klc: BigDecimal::default(),
            token0_price: BigDecimal::default(),
            token1_price: BigDecimal::default(),
            volume_token0: BigDecimal::default(),
            volume_token1: BigDecimal::default(),
            volume_usd: BigDecimal::default(),
            untracked_volume_usd: BigDecimal::default(),
            tx_count: 0,
            created_at_timestamp: timestamp,
            created_at_block_number: block,
            liquidity_provider_count: 0,
        }
    }
}

/// Reverse index: id `tokenA-tokenB` (both orderings) -> pair address.
/// Turns the price-discovery pair scan into an O(1) map hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairLookup {
    pub id: String,
    pub pair_address: Address,
}

/// Singleton (id "1") holding the current KLC price in USD.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bundle {
    pub id: String,
    pub klc_price: BigDecimal,
}

impl Bundle {
    pub fn new() -> Self {
        Self {
            id: "1".to_string(),
            klc_price: BigDecimal::default(),
        }
    }
}

impl Default for Bundle {
    fn default() -> Self {
        Self::new()
    }
}

/// Singleton (id "1") with exchange-wide counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KalyswapFactory {
    pub id: String,
    pub pair_count: u64,
    pub total_volume_klc: BigDecimal,
    pub total_volume_usd: BigDecimal,
    pub untracked_volume_usd: BigDecimal,
    pub total_liquidity_klc: BigDecimal,
    pub total_liquidity_usd: BigDecimal,
    pub tx_count: u64,
}

impl KalyswapFactory {
    pub fn new() -> Self {
        Self {
            id: "1".to_string(),
            pair_count: 0,
            total_volume_klc: BigDecimal::default(),
            total_volume_usd: BigDecimal::default(),
            untracked_volume_usd: BigDecimal::default(),
            total_liquidity_klc: BigDecimal::default(),
            total_liquidity_usd: BigDecimal::default(),
            tx_count: 0,
        }
    }
}

impl Default for KalyswapFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-transaction container with the ordered ids of the logical events
/// reconstructed inside it. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub block_number: u64,
    pub timestamp: u64,
    pub mints: Vec<String>,
    pub burns: Vec<String>,
    pub swaps: Vec<String>,
}

impl Transaction {
    pub fn new(id: String, block_number: u64, timestamp: u64) -> Self {
        Self {
            id,
            block_number,
            timestamp,
            mints: Vec::new(),
            burns: Vec::new(),
            swaps: Vec::new(),
        }
    }
}

/// Completion state of a logical mint.
///
/// A mint is started by the LP-token transfer from the zero address and only
/// completed by the pool's Mint event later in the same transaction; the two
/// states carry different data, so this is a tagged enum rather than a pile
/// of nullable fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MintState {
    Pending,
    Complete {
        sender: Address,
        amount0: BigDecimal,
        amount1: BigDecimal,
        amount_usd: BigDecimal,
        log_index: u64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintEvent {
    pub id: String,
    pub transaction: String,
    pub pair: String,
    pub timestamp: u64,
    pub to: Address,
    /// LP units minted, base units.
    pub liquidity: U256,
    pub state: MintState,
    /// Set when a protocol fee mint was folded into this logical mint.
    pub fee_to: Option<Address>,
    pub fee_liquidity: Option<U256>,
}

impl MintEvent {
    pub fn new(
        id: String,
        transaction: String,
        pair: String,
        timestamp: u64,
        to: Address,
        liquidity: U256,
    ) -> Self {
        Self {
            id,
            transaction,
            pair,
            timestamp,
            to,
            liquidity,
            state: MintState::Pending,
            fee_to: None,
            fee_liquidity: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, MintState::Complete { .. })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurnEvent {
    pub id: String,
    pub transaction: String,
    pub pair: String,
    pub timestamp: u64,
    /// LP units burned, base units.
    pub liquidity: U256,
    /// True while the burn was pre-created by a direct LP transfer to the
    /// pair and still awaits the zero-address transfer leg.
    pub needs_complete: bool,
    pub sender: Option<Address>,
    pub to: Option<Address>,
    pub amount0: Option<BigDecimal>,
    pub amount1: Option<BigDecimal>,
    pub amount_usd: Option<BigDecimal>,
    pub log_index: Option<u64>,
    pub fee_to: Option<Address>,
    pub fee_liquidity: Option<U256>,
}

impl BurnEvent {
    pub fn new(
        id: String,
        transaction: String,
        pair: String,
        timestamp: u64,
        liquidity: U256,
    ) -> Self {
        Self {
            id,
            transaction,
            pair,
            timestamp,
            liquidity,
            needs_complete: false,
            sender: None,
            to: None,
            amount0: None,
            amount1: None,
            amount_usd: None,
            log_index: None,
            fee_to: None,
            fee_liquidity: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapEvent {
    pub id: String,
    pub transaction: String,
    pub pair: String,
    pub timestamp: u64,
    pub sender: Address,
    pub from: Address,
    pub to: Address,
    pub amount0_in: BigDecimal,
    pub amount1_in: BigDecimal,
    pub amount0_out: BigDecimal,
    pub amount1_out: BigDecimal,
    pub amount_usd: BigDecimal,
    pub log_index: u64,
}

/// Exchange-wide daily rollup, id = unix day index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KalyswapDayData {
    pub id: String,
    pub date: u64,
    pub daily_volume_klc: BigDecimal,
    pub daily_volume_usd: BigDecimal,
    pub daily_volume_untracked: BigDecimal,
    pub total_volume_klc: BigDecimal,
    pub total_volume_usd: BigDecimal,
    pub total_liquidity_klc: BigDecimal,
    pub total_liquidity_usd: BigDecimal,
    pub tx_count: u64,
}

/// Per-pair daily rollup, id = `pair-dayIndex`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairDayData {
    pub id: String,
    pub date: u64,
    pub pair_address: Address,
    pub token0: String,
    pub token1: String,
    pub reserve0: BigDecimal,
    pub reserve1: BigDecimal,
    pub total_supply: U256,
    pub reserve_usd: BigDecimal,
    pub daily_volume_token0: BigDecimal,
    pub daily_volume_token1: BigDecimal,
    pub daily_volume_usd: BigDecimal,
    pub daily_txns: u64,
}

/// Per-pair hourly rollup, id = `pair-hourIndex`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairHourData {
    pub id: String,
    pub hour_start_unix: u64,
    pub pair: String,
    pub reserve0: BigDecimal,
    pub reserve1: BigDecimal,
    pub reserve_usd: BigDecimal,
    pub hourly_volume_token0: BigDecimal,
    pub hourly_volume_token1: BigDecimal,
    pub hourly_volume_usd: BigDecimal,
    pub hourly_txns: u64,
}

/// Per-token daily rollup, id = `token-dayIndex`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenDayData {
    pub id: String,
    pub date: u64,
    pub token: String,
    pub daily_volume_token: BigDecimal,
    pub daily_volume_klc: BigDecimal,
    pub daily_volume_usd: BigDecimal,
    pub daily_txns: u64,
    pub total_liquidity_token: BigDecimal,
    pub total_liquidity_klc: BigDecimal,
    pub total_liquidity_usd: BigDecimal,
    pub price_usd: BigDecimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    // The host persists these rows as-is, so the serialized form of the
    // completion state is a contract, not an implementation detail.
    #[test]
    fn mint_state_serializes_as_a_tagged_variant() {
        let mut mint = MintEvent::new(
            "0xabc-0".into(),
            "0xabc".into(),
            "0xpair".into(),
            1_700_000_000,
            Address::from_low_u64_be(7),
            U256::from(5),
        );
        let json = serde_json::to_value(&mint).unwrap();
        assert_eq!(json["state"], serde_json::json!("Pending"));

        mint.state = MintState::Complete {
            sender: Address::from_low_u64_be(7),
            amount0: BigDecimal::from(10),
            amount1: BigDecimal::from(20),
            amount_usd: BigDecimal::from(0),
            log_index: 3,
        };
        let json = serde_json::to_value(&mint).unwrap();
        assert_eq!(json["state"]["Complete"]["log_index"], 3);

        let back: MintEvent = serde_json::from_value(json).unwrap();
        assert!(back.is_complete());
    }
}
