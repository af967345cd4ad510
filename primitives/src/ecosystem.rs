//! Fleet Constants
//!
//! Centralizes pallet identifiers and default parameters shared by the fleet
//! pallet, its mock runtime and keeper tooling.

/// Balance type alias for consistency across the fleet
pub type Balance = u128;

/// Pallet identifiers for deriving pallet-owned accounts.
///
/// Used with `PalletId::into_account_truncating()` to derive the fleet's
/// custody account, which briefly holds assets between ark moves.
pub mod pallet_ids {
  /// Fleet Commander pallet ID (custody account for in-flight assets)
  pub const FLEET_COMMANDER_PALLET_ID: &[u8; 8] = b"py/fleet";
}

/// Default fleet parameters.
///
/// Runtime configurations read these for their `Config` constants and
/// genesis values; governance can change the storage-backed ones later.
pub mod params {
  use super::Balance;

  /// Sentinel amount meaning "everything the source ark holds".
  ///
  /// Rejected when the source is the buffer.
  pub const MAX_AMOUNT: Balance = Balance::MAX;

  /// Default minimum spacing between keeper batches (1 hour).
  pub const DEFAULT_REBALANCE_COOLDOWN_SECS: u64 = 60 * 60;

  /// Default number of instructions accepted per batch.
  pub const DEFAULT_MAX_REBALANCE_OPERATIONS: u32 = 10;

  /// Upper bound governance may raise the per-batch instruction count to.
  pub const MAX_REBALANCE_OPERATIONS_LIMIT: u32 = 50;

  /// Default number of sources a single forced withdrawal may drain.
  pub const DEFAULT_MAX_WITHDRAWAL_OPERATIONS: u32 = 10;

  /// Maximum number of active arks in one fleet (buffer excluded).
  pub const MAX_ARKS: u32 = 32;

  /// Maximum length of opaque board/disembark payloads.
  pub const MAX_ARK_DATA_LEN: u32 = 256;

  /// Number of consecutive rate observations the keeper requires before
  /// acting on a new top ark.
  pub const KEEPER_RATE_WINDOW: u32 = 12;

  /// Balances at or below this amount are not worth moving.
  pub const KEEPER_DUST_THRESHOLD: Balance = 100;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pallet_ids_are_correct_length() {
    assert_eq!(pallet_ids::FLEET_COMMANDER_PALLET_ID.len(), 8);
  }

  #[test]
  fn operation_defaults_fit_the_limit() {
    assert!(params::DEFAULT_MAX_REBALANCE_OPERATIONS <= params::MAX_REBALANCE_OPERATIONS_LIMIT);
    assert!(params::DEFAULT_MAX_WITHDRAWAL_OPERATIONS > 0);
  }

  #[test]
  fn max_amount_is_the_sentinel() {
    assert_eq!(params::MAX_AMOUNT, u128::MAX);
  }
}
