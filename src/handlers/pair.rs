// src/handlers/pair.rs
//
// Pair-level handlers. A single user action shows up as a short sequence of
// low-level logs within one transaction, so `handle_transfer` runs a small
// state machine keyed on the transaction's pending mint/burn lists:
//
//   mint:  Transfer(0x0 -> lp)            starts a pending mint
//          Transfer(0x0 -> lp) again      folds the first as a fee mint
//          Mint(amount0, amount1)         completes the latest mint
//   burn:  Transfer(holder -> pair)       pre-creates a burn (needs_complete)
//          Transfer(pair -> 0x0)          reuses it, or starts a fresh one
//          Burn(amount0, amount1)         fills the final amounts
//
// An incomplete mint encountered while assembling a burn is the protocol fee
// mint of that burn; it is folded into the burn and deleted.

use bigdecimal::{BigDecimal, Zero};
use ethers::types::{Address, U256};
use tracing::debug;

use crate::aggregates::{
    update_kalyswap_day_data, update_pair_day_data, update_pair_hour_data, update_token_day_data,
};
use crate::entities::{BurnEvent, MintEvent, MintState, Pair, SwapEvent, Transaction};
use crate::error::{IndexError, Result};
use crate::events::EventMeta;
use crate::numeric::{address_id, convert_token_to_decimal, safe_div, tx_id};
use crate::pricing::{find_klc_per_token, klc_price_in_usd, tracked_liquidity_usd, tracked_volume_usd};
use crate::settings::{Settings, MINIMUM_LIQUIDITY_UNITS};
use crate::store::Store;

pub fn handle_transfer(
    store: &mut Store,
    settings: &Settings,
    meta: &EventMeta,
    from: Address,
    to: Address,
    value: U256,
) -> Result<()> {
    // pool initialization burns exactly the minimum liquidity into 0x0
    if to == Address::zero() && value == U256::from(MINIMUM_LIQUIDITY_UNITS) {
        debug!(tx = %tx_id(meta.tx_hash), "ignoring minimum-liquidity bootstrap transfer");
        return Ok(());
    }
    // staking deposits/withdrawals move LP tokens without minting or burning
    if from != Address::zero() && settings.is_staking_destination(to) {
        debug!(tx = %tx_id(meta.tx_hash), "ignoring staking deposit transfer");
        return Ok(());
    }
    if to != Address::zero() && settings.is_staking_destination(from) {
        debug!(tx = %tx_id(meta.tx_hash), "ignoring staking withdrawal transfer");
        return Ok(());
    }

    let pair_id = address_id(meta.address);
    let mut pair = store.require_pair(&pair_id)?;

    let transaction_id = tx_id(meta.tx_hash);
    let mut transaction = store
        .transaction(&transaction_id)
        .unwrap_or_else(|| Transaction::new(transaction_id.clone(), meta.block_number, meta.timestamp));

    // mint leg: LP tokens out of the zero address
    if from == Address::zero() {
        pair.total_supply = pair.total_supply.saturating_add(value);
        store.save_pair(pair.clone());

        let pending = match transaction.mints.last() {
            Some(last_id) => {
                let last = store.require_mint(last_id)?;
                (!last.is_complete()).then_some(last)
            }
            None => None,
        };

        match pending {
            None => {
                let id = format!("{}-{}", transaction_id, transaction.mints.len());
                let mint = MintEvent::new(
                    id.clone(),
                    transaction_id.clone(),
                    pair.id.clone(),
                    meta.timestamp,
                    to,
                    value,
                );
                store.save_mint(mint);
                transaction.mints.push(id);
            }
            Some(mut mint) => {
                // second zero-transfer within one logical mint: the earlier
                // one was the protocol fee mint
                mint.fee_to = Some(mint.to);
                mint.fee_liquidity = Some(mint.liquidity);
                mint.to = to;
                mint.liquidity = value;
                store.save_mint(mint);
            }
        }
    }

    // direct send to the pair itself: withdrawal flow, pre-create the burn
    if address_id(to) == pair.id {
        let id = format!("{}-{}", transaction_id, transaction.burns.len());
        let mut burn = BurnEvent::new(
            id.clone(),
            transaction_id.clone(),
            pair.id.clone(),
            meta.timestamp,
            value,
        );
        burn.to = Some(to);
        burn.sender = Some(from);
        burn.needs_complete = true;
        store.save_burn(burn);
        transaction.burns.push(id);
    }

    // burn leg: LP tokens from the pair into the zero address
    if to == Address::zero() && address_id(from) == pair.id {
        pair.total_supply = pair.total_supply.saturating_sub(value);
        store.save_pair(pair.clone());

        let mut burn = match transaction.burns.last() {
            Some(last_id) => {
                let current = store.require_burn(last_id)?;
                if current.needs_complete {
                    current
                } else {
                    fresh_burn(&transaction, &pair, meta, value)
                }
            }
            None => fresh_burn(&transaction, &pair, meta, value),
        };

        // an incomplete mint at this point is this burn's fee mint
        if let Some(last_mint_id) = transaction.mints.last().cloned() {
            let mint = store.require_mint(&last_mint_id)?;
            if !mint.is_complete() {
                burn.fee_to = Some(mint.to);
                burn.fee_liquidity = Some(mint.liquidity);
                store.remove_mint(&last_mint_id);
                transaction.mints.pop();
            }
        }

        if burn.needs_complete {
            // reusing the pre-created burn; its id already sits at the tail
            if let Some(last) = transaction.burns.last_mut() {
                *last = burn.id.clone();
            }
        } else {
            transaction.burns.push(burn.id.clone());
        }
        store.save_burn(burn);
    }

    store.save_transaction(transaction);
    Ok(())
}

fn fresh_burn(transaction: &Transaction, pair: &Pair, meta: &EventMeta, value: U256) -> BurnEvent {
    BurnEvent::new(
        format!("{}-{}", transaction.id, transaction.burns.len()),
        transaction.id.clone(),
        pair.id.clone(),
        meta.timestamp,
        value,
    )
}

pub fn handle_sync(
    store: &mut Store,
    settings: &Settings,
    meta: &EventMeta,
    reserve0: U256,
    reserve1: U256,
) -> Result<()> {
    let pair_id = address_id(meta.address);
    let mut pair = store.require_pair(&pair_id)?;
    let mut token0 = store.require_token(&pair.token0)?;
    let mut token1 = store.require_token(&pair.token1)?;
    let mut factory = store.require_factory()?;

    // back out this pair's old contribution before applying the new reserves
    factory.total_liquidity_klc = &factory.total_liquidity_klc - &pair.tracked_reserve_klc;
    token0.total_liquidity = &token0.total_liquidity - &pair.reserve0;
    token1.total_liquidity = &token1.total_liquidity - &pair.reserve1;

    pair.reserve0 = convert_token_to_decimal(reserve0, token0.decimals);
    pair.reserve1 = convert_token_to_decimal(reserve1, token1.decimals);
    pair.token0_price = safe_div(&pair.reserve0, &pair.reserve1);
    pair.token1_price = safe_div(&pair.reserve1, &pair.reserve0);
    store.save_pair(pair.clone());

    // any reserve change can move the stable-pair-derived KLC price
    let mut bundle = store.require_bundle()?;
    bundle.klc_price = klc_price_in_usd(store, settings, meta.block_number)?;
    store.save_bundle(bundle.clone());

    token0.derived_klc = find_klc_per_token(store, settings, &token0)?;
    token0.derived_usd = &token0.derived_klc * &bundle.klc_price;
    token1.derived_klc = find_klc_per_token(store, settings, &token1)?;
    token1.derived_usd = &token1.derived_klc * &bundle.klc_price;
    store.save_token(token0.clone());
    store.save_token(token1.clone());

    let tracked_liquidity_klc = if !bundle.klc_price.is_zero() {
        let tracked = tracked_liquidity_usd(
            store,
            settings,
            &pair.reserve0,
            &token0,
            &pair.reserve1,
            &token1,
        )?;
        &tracked / &bundle.klc_price
    } else {
        BigDecimal::zero()
    };

    pair.tracked_reserve_klc = tracked_liquidity_klc.clone();
    pair.reserve_klc =
        &pair.reserve0 * &token0.derived_klc + &pair.reserve1 * &token1.derived_klc;
    pair.reserve_usd = &pair.reserve_klc * &bundle.klc_price;

    // global liquidity only counts the tracked share
    factory.total_liquidity_klc = &factory.total_liquidity_klc + &tracked_liquidity_klc;
    factory.total_liquidity_usd = &factory.total_liquidity_klc * &bundle.klc_price;

    token0.total_liquidity = &token0.total_liquidity + &pair.reserve0;
    token1.total_liquidity = &token1.total_liquidity + &pair.reserve1;

    store.save_pair(pair);
    store.save_factory(factory);
    store.save_token(token0);
    store.save_token(token1);
    Ok(())
}

pub fn handle_mint(
    store: &mut Store,
    meta: &EventMeta,
    sender: Address,
    amount0: U256,
    amount1: U256,
) -> Result<()> {
    let transaction_id = tx_id(meta.tx_hash);
    let transaction = store.require_transaction(&transaction_id)?;
    let mint_id = transaction
        .mints
        .last()
        .cloned()
        .ok_or_else(|| IndexError::missing("Mint", format!("{transaction_id}-0")))?;
    let mut mint = store.require_mint(&mint_id)?;

    let mut pair = store.require_pair(&address_id(meta.address))?;
    let mut factory = store.require_factory()?;
    let mut token0 = store.require_token(&pair.token0)?;
    let mut token1 = store.require_token(&pair.token1)?;

    let token0_amount = convert_token_to_decimal(amount0, token0.decimals);
    let token1_amount = convert_token_to_decimal(amount1, token1.decimals);

    token0.tx_count += 1;
    token1.tx_count += 1;

    let bundle = store.require_bundle()?;
    let amount_total_usd = (&token1.derived_klc * &token1_amount
        + &token0.derived_klc * &token0_amount)
        * &bundle.klc_price;

    pair.tx_count += 1;
    factory.tx_count += 1;

    store.save_token(token0.clone());
    store.save_token(token1.clone());
    store.save_pair(pair);
    store.save_factory(factory);

    mint.state = MintState::Complete {
        sender,
        amount0: token0_amount,
        amount1: token1_amount,
        amount_usd: amount_total_usd,
        log_index: meta.log_index,
    };
    store.save_mint(mint);

    update_pair_day_data(store, meta)?;
    update_pair_hour_data(store, meta)?;
    update_kalyswap_day_data(store, meta)?;
    update_token_day_data(store, &token0, meta)?;
    update_token_day_data(store, &token1, meta)?;
    Ok(())
}

pub fn handle_burn(
    store: &mut Store,
    meta: &EventMeta,
    amount0: U256,
    amount1: U256,
) -> Result<()> {
    let transaction_id = tx_id(meta.tx_hash);
    let transaction = store.require_transaction(&transaction_id)?;
    let burn_id = transaction
        .burns
        .last()
        .cloned()
        .ok_or_else(|| IndexError::missing("Burn", format!("{transaction_id}-0")))?;
    let mut burn = store.require_burn(&burn_id)?;

    let mut pair = store.require_pair(&address_id(meta.address))?;
    let mut factory = store.require_factory()?;
    let mut token0 = store.require_token(&pair.token0)?;
    let mut token1 = store.require_token(&pair.token1)?;

    let token0_amount = convert_token_to_decimal(amount0, token0.decimals);
    let token1_amount = convert_token_to_decimal(amount1, token1.decimals);

    token0.tx_count += 1;
    token1.tx_count += 1;

    let bundle = store.require_bundle()?;
    let amount_total_usd = (&token1.derived_klc * &token1_amount
        + &token0.derived_klc * &token0_amount)
        * &bundle.klc_price;

    factory.tx_count += 1;
    pair.tx_count += 1;

    store.save_token(token0.clone());
    store.save_token(token1.clone());
    store.save_pair(pair);
    store.save_factory(factory);

    burn.amount0 = Some(token0_amount);
    burn.amount1 = Some(token1_amount);
    burn.amount_usd = Some(amount_total_usd);
    burn.log_index = Some(meta.log_index);
    store.save_burn(burn);

    update_pair_day_data(store, meta)?;
    update_pair_hour_data(store, meta)?;
    update_kalyswap_day_data(store, meta)?;
    update_token_day_data(store, &token0, meta)?;
    update_token_day_data(store, &token1, meta)?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_swap(
    store: &mut Store,
    settings: &Settings,
    meta: &EventMeta,
    sender: Address,
    amount0_in: U256,
    amount1_in: U256,
    amount0_out: U256,
    amount1_out: U256,
    to: Address,
) -> Result<()> {
    // collapse router pass-through so the swap is attributed to the end user
    let dest = if sender == settings.router_address && to == settings.router_address {
        meta.tx_from
    } else {
        to
    };

    let mut pair = store.require_pair(&address_id(meta.address))?;
    let mut token0 = store.require_token(&pair.token0)?;
    let mut token1 = store.require_token(&pair.token1)?;

    let amount0_in = convert_token_to_decimal(amount0_in, token0.decimals);
    let amount1_in = convert_token_to_decimal(amount1_in, token1.decimals);
    let amount0_out = convert_token_to_decimal(amount0_out, token0.decimals);
    let amount1_out = convert_token_to_decimal(amount1_out, token1.decimals);

    let amount0_total = &amount0_out + &amount0_in;
    let amount1_total = &amount1_out + &amount1_in;

    let bundle = store.require_bundle()?;

    // derived (untracked) valuation averages both sides
    let derived_amount_klc = (&token1.derived_klc * &amount1_total
        + &token0.derived_klc * &amount0_total)
        / BigDecimal::from(2);
    let derived_amount_usd = &derived_amount_klc * &bundle.klc_price;

    let tracked_amount_usd = tracked_volume_usd(
        store,
        settings,
        &amount0_total,
        &token0,
        &amount1_total,
        &token1,
        &pair,
    )?;
    let tracked_amount_klc = if bundle.klc_price.is_zero() {
        BigDecimal::zero()
    } else {
        &tracked_amount_usd / &bundle.klc_price
    };

    token0.trade_volume = &token0.trade_volume + &(&amount0_in + &amount0_out);
    token0.trade_volume_usd = &token0.trade_volume_usd + &tracked_amount_usd;
    token0.untracked_volume_usd = &token0.untracked_volume_usd + &derived_amount_usd;

    token1.trade_volume = &token1.trade_volume + &(&amount1_in + &amount1_out);
    token1.trade_volume_usd = &token1.trade_volume_usd + &tracked_amount_usd;
    token1.untracked_volume_usd = &token1.untracked_volume_usd + &derived_amount_usd;

    token0.tx_count += 1;
    token1.tx_count += 1;

    pair.volume_usd = &pair.volume_usd + &tracked_amount_usd;
    pair.volume_token0 = &pair.volume_token0 + &amount0_total;
    pair.volume_token1 = &pair.volume_token1 + &amount1_total;
    pair.untracked_volume_usd = &pair.untracked_volume_usd + &derived_amount_usd;
    pair.tx_count += 1;

    let mut factory = store.require_factory()?;
    factory.total_volume_usd = &factory.total_volume_usd + &tracked_amount_usd;
    factory.total_volume_klc = &factory.total_volume_klc + &tracked_amount_klc;
    factory.untracked_volume_usd = &factory.untracked_volume_usd + &derived_amount_usd;
    factory.tx_count += 1;

    store.save_pair(pair.clone());
    store.save_token(token0.clone());
    store.save_token(token1.clone());
    store.save_factory(factory);

    let transaction_id = tx_id(meta.tx_hash);
    let mut transaction = store
        .transaction(&transaction_id)
        .unwrap_or_else(|| Transaction::new(transaction_id.clone(), meta.block_number, meta.timestamp));

    let swap = SwapEvent {
        id: format!("{}-{}", transaction_id, transaction.swaps.len()),
        transaction: transaction_id.clone(),
        pair: pair.id.clone(),
        timestamp: transaction.timestamp,
        sender,
        from: meta.tx_from,
        to: dest,
        amount0_in,
        amount1_in,
        amount0_out,
        amount1_out,
        // prefer the tracked valuation when it exists
        amount_usd: if tracked_amount_usd.is_zero() {
            derived_amount_usd.clone()
        } else {
            tracked_amount_usd.clone()
        },
        log_index: meta.log_index,
    };
    store.save_swap(swap.clone());
    transaction.swaps.push(swap.id);
    store.save_transaction(transaction);

    let mut kalyswap_day_data = update_kalyswap_day_data(store, meta)?;
    let mut pair_day_data = update_pair_day_data(store, meta)?;
    let mut pair_hour_data = update_pair_hour_data(store, meta)?;
    let mut token0_day_data = update_token_day_data(store, &token0, meta)?;
    let mut token1_day_data = update_token_day_data(store, &token1, meta)?;

    kalyswap_day_data.daily_volume_usd = &kalyswap_day_data.daily_volume_usd + &tracked_amount_usd;
    kalyswap_day_data.daily_volume_klc = &kalyswap_day_data.daily_volume_klc + &tracked_amount_klc;
    kalyswap_day_data.daily_volume_untracked =
        &kalyswap_day_data.daily_volume_untracked + &derived_amount_usd;
    store.save_kalyswap_day_data(kalyswap_day_data);

    pair_day_data.daily_volume_token0 = &pair_day_data.daily_volume_token0 + &amount0_total;
    pair_day_data.daily_volume_token1 = &pair_day_data.daily_volume_token1 + &amount1_total;
    pair_day_data.daily_volume_usd = &pair_day_data.daily_volume_usd + &tracked_amount_usd;
    store.save_pair_day_data(pair_day_data);

    pair_hour_data.hourly_volume_token0 = &pair_hour_data.hourly_volume_token0 + &amount0_total;
    pair_hour_data.hourly_volume_token1 = &pair_hour_data.hourly_volume_token1 + &amount1_total;
    pair_hour_data.hourly_volume_usd = &pair_hour_data.hourly_volume_usd + &tracked_amount_usd;
    store.save_pair_hour_data(pair_hour_data);

    token0_day_data.daily_volume_token = &token0_day_data.daily_volume_token + &amount0_total;
    token0_day_data.daily_volume_klc =
        &token0_day_data.daily_volume_klc + &(&amount0_total * &token0.derived_klc);
    token0_day_data.daily_volume_usd = &token0_day_data.daily_volume_usd
        + &(&amount0_total * &token0.derived_klc * &bundle.klc_price);
    store.save_token_day_data(token0_day_data);

    token1_day_data.daily_volume_token = &token1_day_data.daily_volume_token + &amount1_total;
    token1_day_data.daily_volume_klc =
        &token1_day_data.daily_volume_klc + &(&amount1_total * &token1.derived_klc);
    token1_day_data.daily_volume_usd = &token1_day_data.daily_volume_usd
        + &(&amount1_total * &token1.derived_klc * &bundle.klc_price);
    store.save_token_day_data(token1_day_data);

    Ok(())
}
