// src/events.rs
//
// Input shapes, transport-agnostic. The host ingestion runtime owns decoding
// and delivery order; by the time an `Event` reaches the indexer it is
// deduplicated and sorted by block, then transaction, then log index.

use ethers::types::{Address, H256, U256};

/// Envelope carried by every chain log.
#[derive(Debug, Clone)]
pub struct EventMeta {
    /// Emitting contract (factory or a pair).
    pub address: Address,
    pub block_number: u64,
    pub timestamp: u64,
    pub tx_hash: H256,
    /// Transaction sender (`tx.from`), used for router pass-through
    /// attribution.
    pub tx_from: Address,
    pub log_index: u64,
}

#[derive(Debug, Clone)]
pub enum EventPayload {
    PairCreated {
        token0: Address,
        token1: Address,
        pair: Address,
    },
    Transfer {
        from: Address,
        to: Address,
        value: U256,
    },
    Sync {
        reserve0: U256,
        reserve1: U256,
    },
    Mint {
        sender: Address,
        amount0: U256,
        amount1: U256,
    },
    Burn {
        sender: Address,
        amount0: U256,
        amount1: U256,
        to: Address,
    },
    Swap {
        sender: Address,
        amount0_in: U256,
        amount1_in: U256,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
    },
}

#[derive(Debug, Clone)]
pub struct Event {
    pub meta: EventMeta,
    pub payload: EventPayload,
}
