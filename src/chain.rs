// src/chain.rs
//
// Boundary to the chain for token metadata. The host provides some way to do
// eth_call against an ERC20 contract; this trait models exactly the five
// accessors the resolver needs, each as a synchronous call that either
// returns a value or reverts. No retries: a revert is a property of the
// contract, not a transient failure.

use ethers::types::Address;
use thiserror::Error;

/// A contract call reverted (or the method does not exist on the contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("contract call reverted")]
pub struct CallReverted;

pub type CallResult<T> = Result<T, CallReverted>;

/// Read-only ERC20 metadata accessors.
///
/// Older tokens implement `symbol()`/`name()` with a `bytes32` return type
/// instead of `string`, so both variants are exposed and the resolver falls
/// back from one to the other.
pub trait Erc20Source {
    fn symbol(&self, token: Address) -> CallResult<String>;
    fn symbol_bytes32(&self, token: Address) -> CallResult<[u8; 32]>;
    fn name(&self, token: Address) -> CallResult<String>;
    fn name_bytes32(&self, token: Address) -> CallResult<[u8; 32]>;
    fn decimals(&self, token: Address) -> CallResult<u32>;
}
