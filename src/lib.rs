//! # Kalyswap Index
//!
//! Incremental state reconstruction for the Kalyswap exchange on KalyChain.
//! The library consumes an ordered stream of decoded chain events emitted by
//! the factory and its pair contracts and folds them into a queryable entity
//! graph: tokens, pairs, exchange-wide counters, per-transaction
//! mint/burn/swap records and hourly/daily rollups.
//!
//! ## Overview
//!
//! Processing is strictly sequential. Every event is routed by its emitting
//! address, applied to the in-memory [`store::Store`] and the resulting rows
//! saved back; handlers never see events out of order and never run
//! concurrently.
//!
//! - **Discovery**: `PairCreated` events from the configured factory register
//!   new pair contracts as event sources and resolve their token metadata.
//! - **Correlation**: LP-token `Transfer` legs are stitched together with the
//!   pool's `Mint`/`Burn` events inside one transaction to reconstruct
//!   logical mints and burns, protocol fee mints included.
//! - **Pricing**: a whitelist of anchor tokens and two stable reference
//!   pairs derive USD valuations for reserves and volumes.
//! - **Rollups**: hourly and daily buckets snapshot reserves and accumulate
//!   volume deltas.

/// Hourly and daily rollup rows.
pub mod aggregates;
/// On-chain read access used for token metadata.
pub mod chain;
/// The derived entity graph.
pub mod entities;
/// Fatal indexing errors.
pub mod error;
/// Decoded input event shapes.
pub mod events;
/// Event handlers for the factory and pair contracts.
pub mod handlers;
/// Event routing and dynamic pair registration.
pub mod indexer;
/// ERC20 symbol/name/decimals resolution with bytes32 fallbacks.
pub mod metadata;
/// Decimal conversion helpers and id formatting.
pub mod numeric;
/// Price discovery and the tracked volume/liquidity policy.
pub mod pricing;
/// Network constants and policy thresholds.
pub mod settings;
/// In-memory entity store.
pub mod store;

pub use chain::{CallResult, CallReverted, Erc20Source};
pub use error::{IndexError, Result};
pub use events::{Event, EventMeta, EventPayload};
pub use indexer::Indexer;
pub use settings::Settings;
pub use store::Store;
