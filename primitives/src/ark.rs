use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use sp_arithmetic::Permill;

use crate::ecosystem::Balance;

/// Role an allocation target plays inside a fleet.
///
/// - `Buffer`: the always-liquid landing zone for deposits and first source for withdrawals.
/// - `Standard`: a yield-bearing ark that only receives funds through rebalancing.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub enum ArkKind {
  Buffer,
  Standard,
}

/// Registry-held configuration of an ark.
///
/// The ark's balance is never part of this struct: it is always read from the
/// ark adapter so the registry cannot drift from what the ark actually holds.
#[derive(
  Clone,
  Copy,
  Debug,
  Decode,
  DecodeWithMemTracking,
  Encode,
  Eq,
  MaxEncodedLen,
  PartialEq,
  TypeInfo,
  Serialize,
  Deserialize,
)]
pub struct ArkConfig {
  /// Absolute ceiling on assets the ark may hold. `0` disables inflow.
  pub deposit_cap: Balance,
  /// Optional ceiling expressed as a share of the fleet's total assets
  #[serde(with = "permill_parts")]
  pub max_deposit_percentage_of_tvl: Option<Permill>,
  /// Ceiling on the cumulative amount moved into the ark within one batch
  pub max_rebalance_inflow: Balance,
  /// Ceiling on the cumulative amount moved out of the ark within one batch
  pub max_rebalance_outflow: Balance,
}

impl ArkConfig {
  /// Configuration of a freshly registered ark: closed for inflow, unbounded flows.
  pub const fn unconfigured() -> Self {
    Self {
      deposit_cap: 0,
      max_deposit_percentage_of_tvl: None,
      max_rebalance_inflow: Balance::MAX,
      max_rebalance_outflow: Balance::MAX,
    }
  }

  /// Implicit configuration of the buffer ark.
  pub const fn buffer() -> Self {
    Self {
      deposit_cap: Balance::MAX,
      max_deposit_percentage_of_tvl: None,
      max_rebalance_inflow: Balance::MAX,
      max_rebalance_outflow: Balance::MAX,
    }
  }

  /// Lesser of the absolute cap and the share-of-TVL cap.
  pub fn effective_cap(&self, fleet_total_assets: Balance) -> Balance {
    match self.max_deposit_percentage_of_tvl {
      Some(pct) => self.deposit_cap.min(pct.mul_floor(fleet_total_assets)),
      None => self.deposit_cap,
    }
  }
}

impl Default for ArkConfig {
  fn default() -> Self {
    Self::unconfigured()
  }
}

/// Serializes `Option<Permill>` as raw parts-per-million.
mod permill_parts {
  use serde::{Deserialize, Deserializer, Serialize, Serializer};
  use sp_arithmetic::Permill;

  pub fn serialize<S: Serializer>(value: &Option<Permill>, s: S) -> Result<S::Ok, S::Error> {
    value.map(|p| p.deconstruct()).serialize(s)
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Permill>, D::Error> {
    Ok(Option::<u32>::deserialize(d)?.map(Permill::from_parts))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn effective_cap_without_percentage_is_absolute_cap() {
    let config = ArkConfig {
      deposit_cap: 5_000,
      ..ArkConfig::unconfigured()
    };
    assert_eq!(config.effective_cap(1_000_000), 5_000);
  }

  #[test]
  fn effective_cap_takes_lesser_of_both_caps() {
    let config = ArkConfig {
      deposit_cap: 5_000,
      max_deposit_percentage_of_tvl: Some(Permill::from_percent(10)),
      ..ArkConfig::unconfigured()
    };
    // 10% of 20_000 is below the absolute cap
    assert_eq!(config.effective_cap(20_000), 2_000);
    // 10% of 100_000 is above it
    assert_eq!(config.effective_cap(100_000), 5_000);
  }

  #[test]
  fn unconfigured_ark_is_closed_for_inflow() {
    let config = ArkConfig::default();
    assert_eq!(config.deposit_cap, 0);
    assert_eq!(config.effective_cap(Balance::MAX), 0);
    assert_eq!(config.max_rebalance_outflow, Balance::MAX);
  }

  #[test]
  fn buffer_is_uncapped() {
    assert_eq!(ArkConfig::buffer().effective_cap(42), Balance::MAX);
  }
}
