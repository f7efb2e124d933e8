// src/settings.rs
//
// Network constants and policy thresholds. Defaults encode the KalyChain
// mainnet deployment; every field can be overridden from config files or
// KALY_* environment variables so the same mappings can index a fork or a
// testnet deployment.

use bigdecimal::BigDecimal;
use config::{Config, ConfigError, Environment, File};
use ethers::types::Address;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::env;

use crate::numeric::address_id;

/// LP units burned into the zero address when a pair is initialized. A
/// transfer of exactly this amount to the zero address is a pool artifact,
/// not a user action.
pub const MINIMUM_LIQUIDITY_UNITS: u64 = 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Factory contract whose PairCreated events drive discovery.
    #[serde(default = "default_factory_address")]
    pub factory_address: Address,
    /// Router contract; swaps routed through it are re-attributed to the
    /// transaction sender.
    #[serde(default = "default_router_address")]
    pub router_address: Address,
    #[serde(default = "default_wklc_address")]
    pub wklc_address: Address,
    #[serde(default = "default_kswap_address")]
    pub kswap_address: Address,
    /// Staking/incentive contracts; LP transfers to or from these are
    /// deposits and withdrawals, not mints or burns.
    #[serde(default = "default_staking_destinations")]
    pub staking_destinations: Vec<Address>,
    /// Pricing anchors, in priority order. Earlier entries win when a token
    /// is paired with several of them.
    #[serde(default = "default_whitelist")]
    pub whitelist: Vec<Address>,
    /// WKLC-USDT reference pair (WKLC is token0) and its creation block.
    #[serde(default = "default_usdt_wklc_pair")]
    pub usdt_wklc_pair: Address,
    #[serde(default = "default_usdt_wklc_pair_block")]
    pub usdt_wklc_pair_block: u64,
    /// WKLC-DAI reference pair (WKLC is token0) and its creation block.
    #[serde(default = "default_dai_wklc_pair")]
    pub dai_wklc_pair: Address,
    #[serde(default = "default_dai_wklc_pair_block")]
    pub dai_wklc_pair_block: u64,
    /// Hard-coded KLC/USD price used before any stable pair exists.
    #[serde(default = "default_average_klc_price_pre_stables")]
    pub average_klc_price_pre_stables: BigDecimal,
    /// Reserve floor (USD) for pairs with fewer than 5 liquidity providers
    /// to count toward tracked volume.
    #[serde(default = "default_minimum_usd_threshold_new_pairs")]
    pub minimum_usd_threshold_new_pairs: BigDecimal,
    /// WKLC-side reserve floor for a pair to be usable as a pricing hop.
    #[serde(default = "default_minimum_liquidity_threshold_klc")]
    pub minimum_liquidity_threshold_klc: BigDecimal,
}

impl Settings {
    /// Layered load: `config/default.toml`, then `config/{RUN_MODE}.toml`,
    /// then `KALY_*` environment overrides. All layers are optional; absent
    /// keys fall back to the mainnet defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "default".into());
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(Environment::with_prefix("KALY").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn is_whitelisted(&self, token_id: &str) -> bool {
        self.whitelist.iter().any(|a| address_id(*a) == token_id)
    }

    pub fn is_staking_destination(&self, address: Address) -> bool {
        self.staking_destinations.contains(&address)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            factory_address: default_factory_address(),
            router_address: default_router_address(),
            wklc_address: default_wklc_address(),
            kswap_address: default_kswap_address(),
            staking_destinations: default_staking_destinations(),
            whitelist: default_whitelist(),
            usdt_wklc_pair: default_usdt_wklc_pair(),
            usdt_wklc_pair_block: default_usdt_wklc_pair_block(),
            dai_wklc_pair: default_dai_wklc_pair(),
            dai_wklc_pair_block: default_dai_wklc_pair_block(),
            average_klc_price_pre_stables: default_average_klc_price_pre_stables(),
            minimum_usd_threshold_new_pairs: default_minimum_usd_threshold_new_pairs(),
            minimum_liquidity_threshold_klc: default_minimum_liquidity_threshold_klc(),
        }
    }
}

fn addr(s: &str) -> Address {
    s.parse().expect("static address literal")
}

// Mainnet constants parsed once on first use.
static MAINNET_STAKING_DESTINATIONS: Lazy<Vec<Address>> =
    Lazy::new(|| vec![addr("0xDbfD50b15cE8249AE736cEB259927E77fEc231bF")]);

static MAINNET_WHITELIST: Lazy<Vec<Address>> = Lazy::new(|| {
    vec![
        default_wklc_address(),
        default_kswap_address(),
        addr("0x37540F0cC489088c01631138Da2E32cF406B83B8"), // USDT
        addr("0xC2AFb6EFca0F6b10f3da80bEC20Dc8DE0DdB689D"), // DAI
        addr("0xaD89ea57db2092b66641e732F51ADf483AC18C21"), // ETH
        addr("0xd0731970CCFeC3eB25C16E956F0B6902FBa75b69"), // WBTC
        addr("0xfF97974fceFD3C6E04C7A6f3C4FA971c4A18f762"), // USDC
    ]
});

fn default_factory_address() -> Address {
    addr("0xD42Af909d323D88e0E933B6c50D3e91c279004ca")
}
fn default_router_address() -> Address {
    addr("0x183F288BF7EEBe1A3f318F4681dF4a70ef32B2f3")
}
fn default_wklc_address() -> Address {
    addr("0x069255299Bb729399f3CECaBdc73d15d3D10a2A3")
}
fn default_kswap_address() -> Address {
    addr("0xCC93b84cEed74Dc28c746b7697d6fA477ffFf65a")
}
fn default_staking_destinations() -> Vec<Address> {
    MAINNET_STAKING_DESTINATIONS.clone()
}
fn default_whitelist() -> Vec<Address> {
    MAINNET_WHITELIST.clone()
}
fn default_usdt_wklc_pair() -> Address {
    addr("0x37eA64bB4D58b6513C80bEFA5Dc777080AD62EB9")
}
fn default_usdt_wklc_pair_block() -> u64 {
    7_227_954
}
fn default_dai_wklc_pair() -> Address {
    addr("0xd8AaCB9a2084f73c53C4Edb5633bfA01124669F6")
}
fn default_dai_wklc_pair_block() -> u64 {
    7_243_398
}
fn default_average_klc_price_pre_stables() -> BigDecimal {
    BigDecimal::from(30)
}
fn default_minimum_usd_threshold_new_pairs() -> BigDecimal {
    BigDecimal::from(1000)
}
fn default_minimum_liquidity_threshold_klc() -> BigDecimal {
    BigDecimal::from(1)
}
