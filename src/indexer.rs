// src/indexer.rs
//
// Single-threaded event pump. Events arrive already ordered by block,
// transaction and log index; `process` routes each one by emitting address.
// Only the configured factory may create pairs, and only pairs the factory
// has registered may emit pair-level events. Everything else is dropped.

use std::collections::HashSet;

use ethers::types::Address;
use tracing::debug;

use crate::chain::Erc20Source;
use crate::error::Result;
use crate::events::{Event, EventPayload};
use crate::handlers::{factory, pair};
use crate::numeric::address_id;
use crate::settings::Settings;
use crate::store::Store;

pub struct Indexer<C: Erc20Source> {
    store: Store,
    settings: Settings,
    chain: C,
    /// Pair contracts registered by PairCreated. Events from addresses
    /// outside this set are not pair events and are ignored.
    pair_sources: HashSet<Address>,
}

impl<C: Erc20Source> Indexer<C> {
    pub fn new(settings: Settings, chain: C) -> Self {
        Self {
            store: Store::new(),
            settings,
            chain,
            pair_sources: HashSet::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn is_registered_pair(&self, address: Address) -> bool {
        self.pair_sources.contains(&address)
    }

    pub fn process(&mut self, event: &Event) -> Result<()> {
        match &event.payload {
            EventPayload::PairCreated { token0, token1, pair } => {
                if event.meta.address != self.settings.factory_address {
                    debug!(source = %address_id(event.meta.address), "PairCreated from unknown factory, ignored");
                    return Ok(());
                }
                let registered = factory::handle_pair_created(
                    &mut self.store,
                    &self.settings,
                    &self.chain,
                    &event.meta,
                    *token0,
                    *token1,
                    *pair,
                )?;
                if let Some(address) = registered {
                    self.pair_sources.insert(address);
                }
                Ok(())
            }
            payload => {
                if !self.pair_sources.contains(&event.meta.address) {
                    debug!(source = %address_id(event.meta.address), "event from unregistered source, ignored");
                    return Ok(());
                }
                match payload {
                    EventPayload::PairCreated { .. } => unreachable!(),
                    EventPayload::Transfer { from, to, value } => pair::handle_transfer(
                        &mut self.store,
                        &self.settings,
                        &event.meta,
                        *from,
                        *to,
                        *value,
                    ),
                    EventPayload::Sync { reserve0, reserve1 } => pair::handle_sync(
                        &mut self.store,
                        &self.settings,
                        &event.meta,
                        *reserve0,
                        *reserve1,
                    ),
                    EventPayload::Mint { sender, amount0, amount1 } => pair::handle_mint(
                        &mut self.store,
                        &event.meta,
                        *sender,
                        *amount0,
                        *amount1,
                    ),
                    EventPayload::Burn { amount0, amount1, .. } => {
                        pair::handle_burn(&mut self.store, &event.meta, *amount0, *amount1)
                    }
                    EventPayload::Swap {
                        sender,
                        amount0_in,
                        amount1_in,
                        amount0_out,
                        amount1_out,
                        to,
                    } => pair::handle_swap(
                        &mut self.store,
                        &self.settings,
                        &event.meta,
                        *sender,
                        *amount0_in,
                        *amount1_in,
                        *amount0_out,
                        *amount1_out,
                        *to,
                    ),
                }
            }
        }
    }
}
