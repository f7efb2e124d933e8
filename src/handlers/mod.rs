/// PairCreated handling: token metadata resolution, pair registration and
/// the reverse lookup index.
pub mod factory;
/// Pair-level handlers: the transfer/sync/mint/burn/swap state machine.
pub mod pair;
