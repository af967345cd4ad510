//! Adapter traits for the fleet's allocation targets.
//!
//! Arks are external protocols; the pallet only sees them through these
//! traits, so runtimes wire in whatever backs an ark and tests use mocks.

use frame::prelude::*;

/// Operations every allocation target (the buffer included) supports.
///
/// `total_assets` is authoritative: the pallet never caches ark balances.
pub trait ArkAdapter<AccountId, Balance> {
  /// Everything the ark currently holds, accrued yield included.
  fn total_assets(ark: &AccountId) -> Balance;

  /// Portion of `total_assets` that can be pulled out right now.
  ///
  /// Arks with lock-ups or exit queues report less (often zero).
  fn withdrawable_assets(ark: &AccountId) -> Balance {
    Self::total_assets(ark)
  }

  /// Move `amount` from `from` into the ark.
  fn board(ark: &AccountId, from: &AccountId, amount: Balance, data: &[u8]) -> DispatchResult;

  /// Move `amount` out of the ark to `to`.
  fn disembark(ark: &AccountId, to: &AccountId, amount: Balance, data: &[u8]) -> DispatchResult;
}

/// Yield rate quotes used by the rebalance rate guard and the keeper planner.
///
/// Rates only need to be comparable with each other; `None` means the ark
/// does not report one and rate checks involving it are skipped.
pub trait ArkRateOracle<AccountId> {
  fn rate(ark: &AccountId) -> Option<u128>;
}

/// Holds nothing and refuses every move.
impl<AccountId, Balance: Default> ArkAdapter<AccountId, Balance> for () {
  fn total_assets(_: &AccountId) -> Balance {
    Balance::default()
  }

  fn board(_: &AccountId, _: &AccountId, _: Balance, _: &[u8]) -> DispatchResult {
    Err(DispatchError::Other("no ark adapter configured"))
  }

  fn disembark(_: &AccountId, _: &AccountId, _: Balance, _: &[u8]) -> DispatchResult {
    Err(DispatchError::Other("no ark adapter configured"))
  }
}

/// No rates; disables the rate guard.
impl<AccountId> ArkRateOracle<AccountId> for () {
  fn rate(_: &AccountId) -> Option<u128> {
    None
  }
}
