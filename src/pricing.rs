// src/pricing.rs
//
// Price discovery and the tracked volume/liquidity policy.
//
// KLC/USD comes from up to two designated stable pairs, selected by comparing
// the block height against each pair's creation block (a static gate, not an
// existence probe). Per-token prices are a single whitelist hop: the first
// anchor the token shares a pair with, found through the PairLookup reverse
// index, prices it; deeper composition relies on the anchor itself already
// being priced.

use bigdecimal::{BigDecimal, One, Zero};

use crate::entities::{Pair, Token};
use crate::error::Result;
use crate::numeric::{address_id, safe_div};
use crate::settings::Settings;
use crate::store::Store;

/// Current KLC price in USD from the stable reference pairs.
///
/// Two pairs live: reserve-weighted average of their independent prices,
/// recomputed on every call since reserves move. One pair: its price. None:
/// the hard-coded pre-stables constant.
pub fn klc_price_in_usd(store: &Store, settings: &Settings, block_number: u64) -> Result<BigDecimal> {
    if block_number > settings.dai_wklc_pair_block {
        // WKLC-USDT and WKLC-DAI both exist; WKLC is token0 on each
        let dai_pair = store.require_pair(&address_id(settings.dai_wklc_pair))?;
        let usdt_pair = store.require_pair(&address_id(settings.usdt_wklc_pair))?;

        let total_liquidity_wklc = &dai_pair.reserve0 + &usdt_pair.reserve0;
        let dai_weight = safe_div(&dai_pair.reserve0, &total_liquidity_wklc);
        let usdt_weight = safe_div(&usdt_pair.reserve0, &total_liquidity_wklc);

        Ok(&dai_pair.token1_price * &dai_weight + &usdt_pair.token1_price * &usdt_weight)
    } else if block_number > settings.usdt_wklc_pair_block {
        let usdt_pair = store.require_pair(&address_id(settings.usdt_wklc_pair))?;
        Ok(usdt_pair.token1_price)
    } else {
        Ok(settings.average_klc_price_pre_stables.clone())
    }
}

/// Derived WKLC value of one unit of `token`, or zero if no whitelist anchor
/// with sufficient reserve is paired with it.
pub fn find_klc_per_token(store: &Store, settings: &Settings, token: &Token) -> Result<BigDecimal> {
    if token.id == address_id(settings.wklc_address) {
        return Ok(BigDecimal::one());
    }

    // whitelist order is a priority order; the first qualifying hit wins
    for anchor in &settings.whitelist {
        let lookup_id = format!("{}-{}", token.id, address_id(*anchor));
        let Some(lookup) = store.pair_lookup(&lookup_id) else {
            continue;
        };
        let pair = store.require_pair(&address_id(lookup.pair_address))?;

        if pair.token0 == token.id && pair.reserve_klc > settings.minimum_liquidity_threshold_klc {
            let token1 = store.require_token(&pair.token1)?;
            // token1 per our token, times WKLC per token1
            return Ok(&pair.token1_price * &token1.derived_klc);
        }
        if pair.token1 == token.id && pair.reserve_klc > settings.minimum_liquidity_threshold_klc {
            let token0 = store.require_token(&pair.token0)?;
            return Ok(&pair.token0_price * &token0.derived_klc);
        }
    }

    Ok(BigDecimal::zero())
}

/// USD volume of a trade that counts toward tracked (headline) metrics.
///
/// Both sides whitelisted: average of the two USD-valued amounts. One side:
/// that side's full value. Neither: zero. Pairs with fewer than 5 liquidity
/// providers must additionally clear a USD reserve floor, which blunts
/// wash-trading through freshly seeded pools.
pub fn tracked_volume_usd(
    store: &Store,
    settings: &Settings,
    token_amount0: &BigDecimal,
    token0: &Token,
    token_amount1: &BigDecimal,
    token1: &Token,
    pair: &Pair,
) -> Result<BigDecimal> {
    let bundle = store.require_bundle()?;
    let price0 = &token0.derived_klc * &bundle.klc_price;
    let price1 = &token1.derived_klc * &bundle.klc_price;

    let whitelisted0 = settings.is_whitelisted(&token0.id);
    let whitelisted1 = settings.is_whitelisted(&token1.id);

    if pair.liquidity_provider_count < 5 {
        let reserve0_usd = &pair.reserve0 * &price0;
        let reserve1_usd = &pair.reserve1 * &price1;
        let threshold = &settings.minimum_usd_threshold_new_pairs;
        let two = BigDecimal::from(2);

        if whitelisted0 && whitelisted1 && &reserve0_usd + &reserve1_usd < *threshold {
            return Ok(BigDecimal::zero());
        }
        if whitelisted0 && !whitelisted1 && &reserve0_usd * &two < *threshold {
            return Ok(BigDecimal::zero());
        }
        if !whitelisted0 && whitelisted1 && &reserve1_usd * &two < *threshold {
            return Ok(BigDecimal::zero());
        }
    }

    if whitelisted0 && whitelisted1 {
        return Ok((token_amount0 * &price0 + token_amount1 * &price1) / BigDecimal::from(2));
    }
    if whitelisted0 && !whitelisted1 {
        return Ok(token_amount0 * &price0);
    }
    if !whitelisted0 && whitelisted1 {
        return Ok(token_amount1 * &price1);
    }

    Ok(BigDecimal::zero())
}

/// USD value of pool reserves that counts toward tracked liquidity.
///
/// Both sides whitelisted: sum. One side: double that side, compensating for
/// the unpriced half of the pool. Neither: zero. No provider-count floor.
pub fn tracked_liquidity_usd(
    store: &Store,
    settings: &Settings,
    token_amount0: &BigDecimal,
    token0: &Token,
    token_amount1: &BigDecimal,
    token1: &Token,
) -> Result<BigDecimal> {
    let bundle = store.require_bundle()?;
    let price0 = &token0.derived_klc * &bundle.klc_price;
    let price1 = &token1.derived_klc * &bundle.klc_price;

    let whitelisted0 = settings.is_whitelisted(&token0.id);
    let whitelisted1 = settings.is_whitelisted(&token1.id);
    let two = BigDecimal::from(2);

    if whitelisted0 && whitelisted1 {
        return Ok(token_amount0 * &price0 + token_amount1 * &price1);
    }
    if whitelisted0 && !whitelisted1 {
        return Ok(token_amount0 * &price0 * two.clone());
    }
    if !whitelisted0 && whitelisted1 {
        return Ok(token_amount1 * &price1 * two.clone());
    }

    Ok(BigDecimal::zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Bundle, PairLookup};
    use ethers::types::Address;

    fn token(id: &str, derived_klc: i64) -> Token {
        let mut t = Token::new(id.to_string(), "T".into(), "T".into(), 18);
        t.derived_klc = BigDecimal::from(derived_klc);
        t
    }

    fn seed_pair(store: &mut Store, settings: &Settings, target: &Token, reserves: (i64, i64)) -> Pair {
        let pair_address: Address = "0x00000000000000000000000000000000000000aa".parse().unwrap();
        let wklc_id = address_id(settings.wklc_address);
        let mut pair = Pair::new(
            address_id(pair_address),
            target.id.clone(),
            wklc_id.clone(),
            0,
            0,
        );
        pair.reserve0 = BigDecimal::from(reserves.0);
        pair.reserve1 = BigDecimal::from(reserves.1);
        pair.token0_price = safe_div(&pair.reserve0, &pair.reserve1);
        pair.token1_price = safe_div(&pair.reserve1, &pair.reserve0);
        pair.reserve_klc = BigDecimal::from(reserves.1);
        store.save_pair(pair.clone());
        store.save_pair_lookup(PairLookup {
            id: format!("{}-{}", target.id, wklc_id),
            pair_address,
        });
        store.save_pair_lookup(PairLookup {
            id: format!("{}-{}", wklc_id, target.id),
            pair_address,
        });
        pair
    }

    #[test]
    fn wklc_itself_is_one() {
        let settings = Settings::default();
        let store = Store::new();
        let wklc = token(&address_id(settings.wklc_address), 0);
        assert_eq!(
            find_klc_per_token(&store, &settings, &wklc).unwrap(),
            BigDecimal::one()
        );
    }

    #[test]
    fn single_hop_through_wklc_pair() {
        // target is token0 with reserves (10, 100): 100/10 * 1 = 10
        let settings = Settings::default();
        let mut store = Store::new();
        let target = token("0x00000000000000000000000000000000000000b0", 0);
        let mut wklc = token(&address_id(settings.wklc_address), 1);
        wklc.derived_klc = BigDecimal::one();
        store.save_token(target.clone());
        store.save_token(wklc);
        seed_pair(&mut store, &settings, &target, (10, 100));

        assert_eq!(
            find_klc_per_token(&store, &settings, &target).unwrap(),
            BigDecimal::from(10)
        );
    }

    #[test]
    fn thin_pair_below_reserve_floor_is_unpriced() {
        let settings = Settings::default();
        let mut store = Store::new();
        let target = token("0x00000000000000000000000000000000000000b0", 0);
        let wklc = token(&address_id(settings.wklc_address), 1);
        store.save_token(target.clone());
        store.save_token(wklc);
        let mut pair = seed_pair(&mut store, &settings, &target, (10, 100));
        pair.reserve_klc = BigDecimal::from(0);
        store.save_pair(pair);

        assert_eq!(
            find_klc_per_token(&store, &settings, &target).unwrap(),
            BigDecimal::zero()
        );
    }

    #[test]
    fn unpaired_token_is_unpriced() {
        let settings = Settings::default();
        let store = Store::new();
        let stray = token("0x00000000000000000000000000000000000000c0", 0);
        assert_eq!(
            find_klc_per_token(&store, &settings, &stray).unwrap(),
            BigDecimal::zero()
        );
    }

    #[test]
    fn klc_price_falls_back_before_stable_pairs() {
        let settings = Settings::default();
        let store = Store::new();
        assert_eq!(
            klc_price_in_usd(&store, &settings, 1).unwrap(),
            BigDecimal::from(30)
        );
    }

    #[test]
    fn klc_price_weights_both_stable_pairs_by_wklc_reserve() {
        let settings = Settings::default();
        let mut store = Store::new();

        // WKLC-USDT: 100 WKLC at price 2, WKLC-DAI: 300 WKLC at price 4
        let mut usdt_pair = Pair::new(
            address_id(settings.usdt_wklc_pair),
            address_id(settings.wklc_address),
            "usdt".into(),
            0,
            0,
        );
        usdt_pair.reserve0 = BigDecimal::from(100);
        usdt_pair.token1_price = BigDecimal::from(2);
        store.save_pair(usdt_pair);

        let mut dai_pair = Pair::new(
            address_id(settings.dai_wklc_pair),
            address_id(settings.wklc_address),
            "dai".into(),
            0,
            0,
        );
        dai_pair.reserve0 = BigDecimal::from(300);
        dai_pair.token1_price = BigDecimal::from(4);
        store.save_pair(dai_pair);

        // 4 * 0.75 + 2 * 0.25 = 3.5
        assert_eq!(
            klc_price_in_usd(&store, &settings, settings.dai_wklc_pair_block + 1).unwrap(),
            "3.5".parse::<BigDecimal>().unwrap()
        );
    }

    #[test]
    fn tracked_volume_zero_when_neither_whitelisted() {
        let settings = Settings::default();
        let mut store = Store::new();
        let mut bundle = Bundle::new();
        bundle.klc_price = BigDecimal::from(30);
        store.save_bundle(bundle);

        let a = token("0x00000000000000000000000000000000000000d0", 1);
        let b = token("0x00000000000000000000000000000000000000d1", 1);
        let pair = Pair::new("p".into(), a.id.clone(), b.id.clone(), 0, 0);

        let tracked = tracked_volume_usd(
            &store,
            &settings,
            &BigDecimal::from(100),
            &a,
            &BigDecimal::from(100),
            &b,
            &pair,
        )
        .unwrap();
        assert_eq!(tracked, BigDecimal::zero());
    }

    #[test]
    fn tracked_liquidity_doubles_single_whitelisted_side() {
        let settings = Settings::default();
        let mut store = Store::new();
        let mut bundle = Bundle::new();
        bundle.klc_price = BigDecimal::from(10);
        store.save_bundle(bundle);

        let wklc = token(&address_id(settings.wklc_address), 1);
        let other = token("0x00000000000000000000000000000000000000d2", 0);

        // 50 WKLC * 1 KLC * $10 * 2 = $1000
        let tracked = tracked_liquidity_usd(
            &store,
            &settings,
            &BigDecimal::from(50),
            &wklc,
            &BigDecimal::from(9999),
            &other,
        )
        .unwrap();
        assert_eq!(tracked, BigDecimal::from(1000));
    }

    #[test]
    fn young_pool_floor_suppresses_thin_whitelisted_volume() {
        let settings = Settings::default();
        let mut store = Store::new();
        let mut bundle = Bundle::new();
        bundle.klc_price = BigDecimal::one();
        store.save_bundle(bundle);

        let wklc = token(&address_id(settings.wklc_address), 1);
        let other = token("0x00000000000000000000000000000000000000d3", 0);
        let mut pair = Pair::new("p".into(), wklc.id.clone(), other.id.clone(), 0, 0);
        // reserve0 USD = 100, doubled 200 < 1000 floor
        pair.reserve0 = BigDecimal::from(100);

        let tracked = tracked_volume_usd(
            &store,
            &settings,
            &BigDecimal::from(10),
            &wklc,
            &BigDecimal::from(10),
            &other,
            &pair,
        )
        .unwrap();
        assert_eq!(tracked, BigDecimal::zero());
    }
}
