// src/store.rs
//
// In-memory entity store with the load/save/remove contract the handlers are
// written against: load returns a cloned row or None, save overwrites, remove
// deletes. Handlers are invoked strictly sequentially with `&mut` access, so
// read-modify-write is atomic per event without any locking; a port to a
// concurrent runtime must put a single-writer discipline back around this
// type.

use std::collections::HashMap;

use crate::entities::*;
use crate::error::{IndexError, Result};

#[derive(Debug, Default)]
pub struct Store {
    tokens: HashMap<String, Token>,
    pairs: HashMap<String, Pair>,
    pair_lookups: HashMap<String, PairLookup>,
    bundle: Option<Bundle>,
    factory: Option<KalyswapFactory>,
    transactions: HashMap<String, Transaction>,
    mints: HashMap<String, MintEvent>,
    burns: HashMap<String, BurnEvent>,
    swaps: HashMap<String, SwapEvent>,
    kalyswap_day_data: HashMap<String, KalyswapDayData>,
    pair_day_data: HashMap<String, PairDayData>,
    pair_hour_data: HashMap<String, PairHourData>,
    token_day_data: HashMap<String, TokenDayData>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // -- tokens

    pub fn token(&self, id: &str) -> Option<Token> {
        self.tokens.get(id).cloned()
    }

    pub fn require_token(&self, id: &str) -> Result<Token> {
        self.token(id)
            .ok_or_else(|| IndexError::missing("Token", id))
    }

    pub fn save_token(&mut self, token: Token) {
        self.tokens.insert(token.id.clone(), token);
    }

    // -- pairs

    pub fn pair(&self, id: &str) -> Option<Pair> {
        self.pairs.get(id).cloned()
    }

    pub fn require_pair(&self, id: &str) -> Result<Pair> {
        self.pair(id).ok_or_else(|| IndexError::missing("Pair", id))
    }

    pub fn save_pair(&mut self, pair: Pair) {
        self.pairs.insert(pair.id.clone(), pair);
    }

    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    // -- pair lookup index

    pub fn pair_lookup(&self, id: &str) -> Option<PairLookup> {
        self.pair_lookups.get(id).cloned()
    }

    pub fn save_pair_lookup(&mut self, lookup: PairLookup) {
        self.pair_lookups.insert(lookup.id.clone(), lookup);
    }

    // -- singletons

    pub fn bundle(&self) -> Option<Bundle> {
        self.bundle.clone()
    }

    pub fn require_bundle(&self) -> Result<Bundle> {
        self.bundle()
            .ok_or_else(|| IndexError::missing("Bundle", "1"))
    }

    pub fn save_bundle(&mut self, bundle: Bundle) {
        self.bundle = Some(bundle);
    }

    pub fn factory(&self) -> Option<KalyswapFactory> {
        self.factory.clone()
    }

    pub fn require_factory(&self) -> Result<KalyswapFactory> {
        self.factory()
            .ok_or_else(|| IndexError::missing("KalyswapFactory", "1"))
    }

    pub fn save_factory(&mut self, factory: KalyswapFactory) {
        self.factory = Some(factory);
    }

    // -- transactions and logical events

    pub fn transaction(&self, id: &str) -> Option<Transaction> {
        self.transactions.get(id).cloned()
    }

    pub fn require_transaction(&self, id: &str) -> Result<Transaction> {
        self.transaction(id)
            .ok_or_else(|| IndexError::missing("Transaction", id))
    }

    pub fn save_transaction(&mut self, transaction: Transaction) {
        self.transactions.insert(transaction.id.clone(), transaction);
    }

    pub fn mint(&self, id: &str) -> Option<MintEvent> {
        self.mints.get(id).cloned()
    }

    pub fn require_mint(&self, id: &str) -> Result<MintEvent> {
        self.mint(id).ok_or_else(|| IndexError::missing("Mint", id))
    }

    pub fn save_mint(&mut self, mint: MintEvent) {
        self.mints.insert(mint.id.clone(), mint);
    }

    pub fn remove_mint(&mut self, id: &str) {
        self.mints.remove(id);
    }

    pub fn mint_count(&self) -> usize {
        self.mints.len()
    }

    pub fn burn(&self, id: &str) -> Option<BurnEvent> {
        self.burns.get(id).cloned()
    }

    pub fn require_burn(&self, id: &str) -> Result<BurnEvent> {
        self.burn(id).ok_or_else(|| IndexError::missing("Burn", id))
    }

    pub fn save_burn(&mut self, burn: BurnEvent) {
        self.burns.insert(burn.id.clone(), burn);
    }

    pub fn burn_count(&self) -> usize {
        self.burns.len()
    }

    pub fn swap(&self, id: &str) -> Option<SwapEvent> {
        self.swaps.get(id).cloned()
    }

    pub fn save_swap(&mut self, swap: SwapEvent) {
        self.swaps.insert(swap.id.clone(), swap);
    }

    pub fn swap_count(&self) -> usize {
        self.swaps.len()
    }

    // -- time buckets

    pub fn kalyswap_day_data(&self, id: &str) -> Option<KalyswapDayData> {
        self.kalyswap_day_data.get(id).cloned()
    }

    pub fn save_kalyswap_day_data(&mut self, row: KalyswapDayData) {
        self.kalyswap_day_data.insert(row.id.clone(), row);
    }

    pub fn pair_day_data(&self, id: &str) -> Option<PairDayData> {
        self.pair_day_data.get(id).cloned()
    }

    pub fn save_pair_day_data(&mut self, row: PairDayData) {
        self.pair_day_data.insert(row.id.clone(), row);
    }

    pub fn pair_hour_data(&self, id: &str) -> Option<PairHourData> {
        self.pair_hour_data.get(id).cloned()
    }

    pub fn save_pair_hour_data(&mut self, row: PairHourData) {
        self.pair_hour_data.insert(row.id.clone(), row);
    }

    pub fn pair_hour_data_count(&self) -> usize {
        self.pair_hour_data.len()
    }

    pub fn token_day_data(&self, id: &str) -> Option<TokenDayData> {
        self.token_day_data.get(id).cloned()
    }

    pub fn save_token_day_data(&mut self, row: TokenDayData) {
        self.token_day_data.insert(row.id.clone(), row);
    }

    pub fn token_day_data_count(&self) -> usize {
        self.token_day_data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_reports_entity_kind_and_id() {
        let store = Store::new();
        let err = store.require_pair("0xdead").unwrap_err();
        assert_eq!(
            err.to_string(),
            "required Pair `0xdead` is missing from the entity store"
        );
    }

    #[test]
    fn save_overwrites_without_duplicating() {
        let mut store = Store::new();
        let mut bundle = Bundle::new();
        store.save_bundle(bundle.clone());
        bundle.klc_price = bigdecimal::BigDecimal::from(2);
        store.save_bundle(bundle);
        assert_eq!(
            store.require_bundle().unwrap().klc_price,
            bigdecimal::BigDecimal::from(2)
        );
    }
}
