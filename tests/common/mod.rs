#![allow(dead_code)]

use std::collections::HashMap;

use ethers::types::{Address, H256, U256};
use kalyswap_index::chain::{CallResult, CallReverted, Erc20Source};
use kalyswap_index::events::{Event, EventMeta, EventPayload};
use kalyswap_index::{Indexer, Settings, Store};

pub fn addr(n: u64) -> Address {
    Address::from_low_u64_be(n)
}

/// `n` whole tokens in 18-decimal base units.
pub fn wei(n: u64) -> U256 {
    U256::from(n) * U256::exp10(18)
}

/// In-memory ERC20 metadata source. Unregistered tokens revert on every
/// accessor, which is also how a non-contract address behaves.
#[derive(Default)]
pub struct MockChain {
    tokens: HashMap<Address, (String, u32)>,
}

impl MockChain {
    pub fn with_token(mut self, address: Address, symbol: &str, decimals: u32) -> Self {
        self.tokens.insert(address, (symbol.to_string(), decimals));
        self
    }
}

impl Erc20Source for MockChain {
    fn symbol(&self, token: Address) -> CallResult<String> {
        self.tokens
            .get(&token)
            .map(|(s, _)| s.clone())
            .ok_or(CallReverted)
    }
    fn symbol_bytes32(&self, _token: Address) -> CallResult<[u8; 32]> {
        Err(CallReverted)
    }
    fn name(&self, token: Address) -> CallResult<String> {
        self.tokens
            .get(&token)
            .map(|(s, _)| format!("{s} Token"))
            .ok_or(CallReverted)
    }
    fn name_bytes32(&self, _token: Address) -> CallResult<[u8; 32]> {
        Err(CallReverted)
    }
    fn decimals(&self, token: Address) -> CallResult<u32> {
        self.tokens
            .get(&token)
            .map(|(_, d)| *d)
            .ok_or(CallReverted)
    }
}

/// Drives an indexer with hand-built events. Log indexes increment within
/// the current transaction; `next_tx` starts a fresh one.
pub struct Harness {
    pub indexer: Indexer<MockChain>,
    pub settings: Settings,
    pub block: u64,
    pub timestamp: u64,
    pub tx: H256,
    pub tx_from: Address,
    log_index: u64,
}

impl Harness {
    pub fn new(chain: MockChain) -> Self {
        // capture handler logs in test output; later calls are no-ops
        tracing_subscriber::fmt().with_test_writer().try_init().ok();
        let settings = Settings::default();
        Self {
            indexer: Indexer::new(settings.clone(), chain),
            settings,
            block: 100,
            timestamp: 1_700_000_000,
            tx: H256::from_low_u64_be(1),
            tx_from: addr(0xF00D),
            log_index: 0,
        }
    }

    pub fn store(&self) -> &Store {
        self.indexer.store()
    }

    pub fn tx_id(&self) -> String {
        format!("{:?}", self.tx)
    }

    pub fn next_tx(&mut self, n: u64) {
        self.tx = H256::from_low_u64_be(n);
        self.log_index = 0;
    }

    pub fn send(&mut self, source: Address, payload: EventPayload) {
        let meta = EventMeta {
            address: source,
            block_number: self.block,
            timestamp: self.timestamp,
            tx_hash: self.tx,
            tx_from: self.tx_from,
            log_index: self.log_index,
        };
        self.log_index += 1;
        self.indexer
            .process(&Event { meta, payload })
            .expect("event application failed");
    }

    pub fn create_pair(&mut self, token0: Address, token1: Address, pair: Address) {
        self.send(
            self.settings.factory_address,
            EventPayload::PairCreated { token0, token1, pair },
        );
    }

    pub fn transfer(&mut self, pair: Address, from: Address, to: Address, value: U256) {
        self.send(pair, EventPayload::Transfer { from, to, value });
    }

    pub fn sync(&mut self, pair: Address, reserve0: U256, reserve1: U256) {
        self.send(pair, EventPayload::Sync { reserve0, reserve1 });
    }

    pub fn mint(&mut self, pair: Address, sender: Address, amount0: U256, amount1: U256) {
        self.send(pair, EventPayload::Mint { sender, amount0, amount1 });
    }

    pub fn burn(&mut self, pair: Address, amount0: U256, amount1: U256) {
        self.send(
            pair,
            EventPayload::Burn {
                sender: Address::zero(),
                amount0,
                amount1,
                to: Address::zero(),
            },
        );
    }

    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        &mut self,
        pair: Address,
        sender: Address,
        amount0_in: U256,
        amount1_in: U256,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
    ) {
        self.send(
            pair,
            EventPayload::Swap {
                sender,
                amount0_in,
                amount1_in,
                amount0_out,
                amount1_out,
                to,
            },
        );
    }
}
