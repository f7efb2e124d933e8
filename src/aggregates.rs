// src/aggregates.rs
//
// Hourly and daily rollups. Bucket id is the integer division of the block
// timestamp by the bucket length; rows are created with zeroed deltas on the
// first event of a bucket and stay mutable for the bucket's whole lifetime.
// Snapshot fields (reserves, supply, prices, liquidity) are refreshed on
// every touch; volume deltas are accumulated by the swap handler after these
// functions return the row.

use bigdecimal::BigDecimal;

use crate::entities::{KalyswapDayData, PairDayData, PairHourData, Token, TokenDayData};
use crate::error::Result;
use crate::events::EventMeta;
use crate::numeric::address_id;
use crate::store::Store;

const HOUR_SECONDS: u64 = 3600;
const DAY_SECONDS: u64 = 86400;

pub fn update_kalyswap_day_data(store: &mut Store, meta: &EventMeta) -> Result<KalyswapDayData> {
    let factory = store.require_factory()?;
    let day_id = meta.timestamp / DAY_SECONDS;
    let day_start = day_id * DAY_SECONDS;

    let mut day_data = store
        .kalyswap_day_data(&day_id.to_string())
        .unwrap_or_else(|| KalyswapDayData {
            id: day_id.to_string(),
            date: day_start,
            daily_volume_klc: BigDecimal::default(),
            daily_volume_usd: BigDecimal::default(),
            daily_volume_untracked: BigDecimal::default(),
            total_volume_klc: BigDecimal::default(),
            total_volume_usd: BigDecimal::default(),
            total_liquidity_klc: BigDecimal::default(),
            total_liquidity_usd: BigDecimal::default(),
            tx_count: 0,
        });

    day_data.total_liquidity_usd = factory.total_liquidity_usd;
    day_data.total_liquidity_klc = factory.total_liquidity_klc;
    day_data.tx_count = factory.tx_count;
    store.save_kalyswap_day_data(day_data.clone());

    Ok(day_data)
}

pub fn update_pair_day_data(store: &mut Store, meta: &EventMeta) -> Result<PairDayData> {
    let day_id = meta.timestamp / DAY_SECONDS;
    let day_start = day_id * DAY_SECONDS;
    let pair_id = address_id(meta.address);
    let row_id = format!("{pair_id}-{day_id}");
    let pair = store.require_pair(&pair_id)?;

    let mut day_data = store.pair_day_data(&row_id).unwrap_or_else(|| PairDayData {
        id: row_id.clone(),
        date: day_start,
        pair_address: meta.address,
        token0: pair.token0.clone(),
        token1: pair.token1.clone(),
        reserve0: BigDecimal::default(),
        reserve1: BigDecimal::default(),
        total_supply: Default::default(),
        reserve_usd: BigDecimal::default(),
        daily_volume_token0: BigDecimal::default(),
        daily_volume_token1: BigDecimal::default(),
        daily_volume_usd: BigDecimal::default(),
        daily_txns: 0,
    });

    day_data.total_supply = pair.total_supply;
    day_data.reserve0 = pair.reserve0;
    day_data.reserve1 = pair.reserve1;
    day_data.reserve_usd = pair.reserve_usd;
    day_data.daily_txns += 1;
    store.save_pair_day_data(day_data.clone());

    Ok(day_data)
}

pub fn update_pair_hour_data(store: &mut Store, meta: &EventMeta) -> Result<PairHourData> {
    let hour_id = meta.timestamp / HOUR_SECONDS;
    let hour_start = hour_id * HOUR_SECONDS;
    let pair_id = address_id(meta.address);
    let row_id = format!("{pair_id}-{hour_id}");
    let pair = store.require_pair(&pair_id)?;

    let mut hour_data = store.pair_hour_data(&row_id).unwrap_or_else(|| PairHourData {
        id: row_id.clone(),
        hour_start_unix: hour_start,
        pair: pair.id.clone(),
        reserve0: BigDecimal::default(),
        reserve1: BigDecimal::default(),
        reserve_usd: BigDecimal::default(),
        hourly_volume_token0: BigDecimal::default(),
        hourly_volume_token1: BigDecimal::default(),
        hourly_volume_usd: BigDecimal::default(),
        hourly_txns: 0,
    });

    hour_data.reserve0 = pair.reserve0;
    hour_data.reserve1 = pair.reserve1;
    hour_data.reserve_usd = pair.reserve_usd;
    hour_data.hourly_txns += 1;
    store.save_pair_hour_data(hour_data.clone());

    Ok(hour_data)
}

pub fn update_token_day_data(store: &mut Store, token: &Token, meta: &EventMeta) -> Result<TokenDayData> {
    let bundle = store.require_bundle()?;
    let day_id = meta.timestamp / DAY_SECONDS;
    let day_start = day_id * DAY_SECONDS;
    let row_id = format!("{}-{day_id}", token.id);

    let mut day_data = store.token_day_data(&row_id).unwrap_or_else(|| TokenDayData {
        id: row_id.clone(),
        date: day_start,
        token: token.id.clone(),
        daily_volume_token: BigDecimal::default(),
        daily_volume_klc: BigDecimal::default(),
        daily_volume_usd: BigDecimal::default(),
        daily_txns: 0,
        total_liquidity_token: BigDecimal::default(),
        total_liquidity_klc: BigDecimal::default(),
        total_liquidity_usd: BigDecimal::default(),
        price_usd: &token.derived_klc * &bundle.klc_price,
    });

    day_data.price_usd = &token.derived_klc * &bundle.klc_price;
    day_data.total_liquidity_token = token.total_liquidity.clone();
    day_data.total_liquidity_klc = &token.total_liquidity * &token.derived_klc;
    day_data.total_liquidity_usd = &day_data.total_liquidity_klc * &bundle.klc_price;
    day_data.daily_txns += 1;
    store.save_token_day_data(day_data.clone());

    Ok(day_data)
}
