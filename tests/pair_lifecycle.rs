mod common;

use common::{addr, Harness, MockChain};
use ethers::types::U256;
use kalyswap_index::numeric::address_id;

#[test]
fn pair_created_persists_tokens_pair_and_lookup() {
    let t0 = addr(0xA1);
    let t1 = addr(0xB1);
    let pair = addr(0xCAFE);
    let chain = MockChain::default()
        .with_token(t0, "ALPHA", 18)
        .with_token(t1, "BETA", 6);
    let mut h = Harness::new(chain);

    h.create_pair(t0, t1, pair);

    let token0 = h.store().token(&address_id(t0)).unwrap();
    assert_eq!(token0.symbol, "ALPHA");
    assert_eq!(token0.name, "ALPHA Token");
    assert_eq!(token0.decimals, 18);

    let token1 = h.store().token(&address_id(t1)).unwrap();
    assert_eq!(token1.decimals, 6);

    let row = h.store().pair(&address_id(pair)).unwrap();
    assert_eq!(row.token0, address_id(t0));
    assert_eq!(row.token1, address_id(t1));
    assert_eq!(row.total_supply, U256::zero());

    // both orderings resolve to the same pair
    let forward = format!("{}-{}", address_id(t0), address_id(t1));
    let backward = format!("{}-{}", address_id(t1), address_id(t0));
    assert_eq!(h.store().pair_lookup(&forward).unwrap().pair_address, pair);
    assert_eq!(h.store().pair_lookup(&backward).unwrap().pair_address, pair);

    let factory = h.store().factory().unwrap();
    assert_eq!(factory.pair_count, 1);
    assert!(h.store().bundle().is_some());
    assert!(h.indexer.is_registered_pair(pair));
}

#[test]
fn well_known_tokens_skip_metadata_calls() {
    let tkn = addr(0xB2);
    let chain = MockChain::default().with_token(tkn, "TKN", 18);
    let mut h = Harness::new(chain);
    let wklc = h.settings.wklc_address;

    // WKLC is not registered in the mock chain at all
    h.create_pair(wklc, tkn, addr(0xCAFE));

    let token = h.store().token(&address_id(wklc)).unwrap();
    assert_eq!(token.symbol, "WKLC");
    assert_eq!(token.decimals, 18);
}

#[test]
fn unresolvable_decimals_abort_pair_but_count_it() {
    let t0 = addr(0xA1);
    let ghost = addr(0xDEAD);
    let pair = addr(0xCAFE);
    // only token0 resolves; ghost reverts on everything
    let chain = MockChain::default().with_token(t0, "ALPHA", 18);
    let mut h = Harness::new(chain);

    h.create_pair(t0, ghost, pair);

    // token0 was resolved before the abort and stays persisted
    assert!(h.store().token(&address_id(t0)).is_some());
    assert!(h.store().token(&address_id(ghost)).is_none());
    assert!(h.store().pair(&address_id(pair)).is_none());
    assert!(!h.indexer.is_registered_pair(pair));

    // the factory counter had already moved
    assert_eq!(h.store().factory().unwrap().pair_count, 1);

    // the aborted pair never becomes an event source
    h.next_tx(2);
    h.sync(pair, U256::from(1), U256::from(1));
    assert_eq!(h.store().pair_count(), 0);
}

#[test]
fn pair_created_from_unknown_factory_is_ignored() {
    let t0 = addr(0xA1);
    let t1 = addr(0xB1);
    let chain = MockChain::default()
        .with_token(t0, "ALPHA", 18)
        .with_token(t1, "BETA", 18);
    let mut h = Harness::new(chain);

    h.send(
        addr(0x9999),
        kalyswap_index::EventPayload::PairCreated {
            token0: t0,
            token1: t1,
            pair: addr(0xCAFE),
        },
    );

    assert!(h.store().factory().is_none());
    assert_eq!(h.store().pair_count(), 0);
}

#[test]
fn events_from_unregistered_sources_are_dropped() {
    let chain = MockChain::default();
    let mut h = Harness::new(chain);

    // no pair exists; these must be silently dropped, not errors
    h.sync(addr(0x5555), U256::from(10), U256::from(10));
    h.transfer(addr(0x5555), addr(1), addr(2), U256::from(10));

    assert_eq!(h.store().pair_count(), 0);
    assert!(h.store().transaction(&h.tx_id()).is_none());
}
