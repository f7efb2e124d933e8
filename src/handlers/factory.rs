// src/handlers/factory.rs
//
// PairCreated handler. Creates the factory and bundle singletons lazily on
// the very first pair, resolves token metadata (aborting the pair when a
// token's decimals are unresolvable), persists the pair with zeroed
// cumulative fields and inserts both directions into the reverse lookup
// index.

use ethers::types::Address;
use tracing::{info, warn};

use crate::chain::Erc20Source;
use crate::entities::{Bundle, KalyswapFactory, Pair, PairLookup, Token};
use crate::error::Result;
use crate::events::EventMeta;
use crate::metadata::{fetch_token_decimals, fetch_token_name, fetch_token_symbol};
use crate::numeric::address_id;
use crate::settings::Settings;
use crate::store::Store;

/// Returns the pair address to register as a dynamic event source, or `None`
/// when creation was aborted because a token's decimals were unresolvable.
pub fn handle_pair_created<C: Erc20Source>(
    store: &mut Store,
    settings: &Settings,
    chain: &C,
    meta: &EventMeta,
    token0_address: Address,
    token1_address: Address,
    pair_address: Address,
) -> Result<Option<Address>> {
    let mut factory = match store.factory() {
        Some(factory) => factory,
        None => {
            // first pair ever: the bundle singleton comes to life with it
            store.save_bundle(Bundle::new());
            KalyswapFactory::new()
        }
    };
    factory.pair_count += 1;
    store.save_factory(factory);

    let Some(token0) = get_or_create_token(store, settings, chain, token0_address) else {
        return Ok(None);
    };
    let Some(token1) = get_or_create_token(store, settings, chain, token1_address) else {
        return Ok(None);
    };

    let pair = Pair::new(
        address_id(pair_address),
        token0.id.clone(),
        token1.id.clone(),
        meta.timestamp,
        meta.block_number,
    );
    store.save_pair(pair);

    // both directions so price discovery can probe either ordering
    store.save_pair_lookup(PairLookup {
        id: format!("{}-{}", token0.id, token1.id),
        pair_address,
    });
    store.save_pair_lookup(PairLookup {
        id: format!("{}-{}", token1.id, token0.id),
        pair_address,
    });

    info!(
        pair = %address_id(pair_address),
        token0 = %token0.symbol,
        token1 = %token1.symbol,
        "pair created"
    );

    Ok(Some(pair_address))
}

fn get_or_create_token<C: Erc20Source>(
    store: &mut Store,
    settings: &Settings,
    chain: &C,
    address: Address,
) -> Option<Token> {
    let id = address_id(address);
    if let Some(existing) = store.token(&id) {
        return Some(existing);
    }

    let symbol = fetch_token_symbol(chain, settings, address);
    let name = fetch_token_name(chain, settings, address);
    let Some(decimals) = fetch_token_decimals(chain, settings, address) else {
        warn!(token = %id, "decimals unresolvable, skipping token and pair creation");
        return None;
    };

    let token = Token::new(id, symbol, name, decimals);
    store.save_token(token.clone());
    Some(token)
}
