//! Stateless validation rules shared by the rebalance and buffer engines.
//!
//! Nothing here touches storage; callers read balances and configuration
//! and feed them in, which keeps every rule testable on plain numbers.

use alloc::collections::BTreeMap;
use frame::deps::sp_runtime::Permill;
use polkadot_sdk::frame_support::ensure;

use crate::types::{Balance, FleetError};

/// Cumulative per-ark flows within one batch.
///
/// Lives only for the duration of a call; limits never carry over.
pub struct FlowTracker<AccountId> {
  inflows: BTreeMap<AccountId, Balance>,
  outflows: BTreeMap<AccountId, Balance>,
}

impl<AccountId: Ord> Default for FlowTracker<AccountId> {
  fn default() -> Self {
    Self {
      inflows: BTreeMap::new(),
      outflows: BTreeMap::new(),
    }
  }
}

impl<AccountId: Ord + Clone> FlowTracker<AccountId> {
  /// Add a move to both totals, then check the source's outflow limit
  /// followed by the target's inflow limit.
  pub fn record(
    &mut self,
    from: &AccountId,
    to: &AccountId,
    amount: Balance,
    outflow_limit: Balance,
    inflow_limit: Balance,
  ) -> Result<(), FleetError<AccountId>> {
    let outflow = Self::accumulate(&mut self.outflows, from, amount);
    let inflow = Self::accumulate(&mut self.inflows, to, amount);
    ensure!(
      outflow <= outflow_limit,
      FleetError::ExceedsMaxOutflow {
        ark: from.clone(),
        cumulative: outflow,
        limit: outflow_limit,
      }
    );
    ensure!(
      inflow <= inflow_limit,
      FleetError::ExceedsMaxInflow {
        ark: to.clone(),
        cumulative: inflow,
        limit: inflow_limit,
      }
    );
    Ok(())
  }

  pub fn inflow(&self, ark: &AccountId) -> Balance {
    self.inflows.get(ark).copied().unwrap_or_default()
  }

  pub fn outflow(&self, ark: &AccountId) -> Balance {
    self.outflows.get(ark).copied().unwrap_or_default()
  }

  fn accumulate(
    totals: &mut BTreeMap<AccountId, Balance>,
    ark: &AccountId,
    amount: Balance,
  ) -> Balance {
    let total = totals.entry(ark.clone()).or_default();
    *total = total.saturating_add(amount);
    *total
  }
}

/// `now - last >= cooldown`, evaluated against the current cooldown.
pub fn ensure_cooldown_elapsed<AccountId>(
  last: u64,
  cooldown: u64,
  now: u64,
) -> Result<(), FleetError<AccountId>> {
  ensure!(
    now.saturating_sub(last) >= cooldown,
    FleetError::CooldownNotElapsed {
      last,
      cooldown,
      now
    }
  );
  Ok(())
}

/// Batch must be non-empty and no longer than `limit`.
pub fn ensure_operation_count<AccountId>(
  count: usize,
  limit: u32,
) -> Result<(), FleetError<AccountId>> {
  ensure!(count > 0, FleetError::NoOperations);
  let count = u32::try_from(count).unwrap_or(u32::MAX);
  ensure!(
    count <= limit,
    FleetError::TooManyOperations { count, limit }
  );
  Ok(())
}

/// Moving `amount` into an ark holding `current` must stay within `cap`.
pub fn ensure_within_cap<AccountId: Clone>(
  ark: &AccountId,
  current: Balance,
  amount: Balance,
  cap: Balance,
) -> Result<(), FleetError<AccountId>> {
  let projected = current.saturating_add(amount);
  ensure!(
    projected <= cap,
    FleetError::EffectiveDepositCapExceeded {
      ark: ark.clone(),
      projected,
      cap,
    }
  );
  Ok(())
}

/// Buffer balance above the configured floor.
pub fn buffer_excess(buffer_assets: Balance, minimum: Balance) -> Balance {
  buffer_assets.saturating_sub(minimum)
}

/// The buffer may only fund `requested` out of its excess. Never clamps.
pub fn ensure_buffer_can_fund<AccountId>(
  requested: Balance,
  buffer_assets: Balance,
  minimum: Balance,
) -> Result<(), FleetError<AccountId>> {
  let available = buffer_excess(buffer_assets, minimum);
  ensure!(available > 0, FleetError::NoExcessFunds);
  ensure!(
    requested <= available,
    FleetError::InsufficientBuffer {
      requested,
      available
    }
  );
  Ok(())
}

/// Whether `to_rate` beats `from_rate` by at least `minimum` of `from_rate`.
pub fn rate_improves(from_rate: u128, to_rate: u128, minimum: Permill) -> bool {
  to_rate >= from_rate.saturating_add(minimum.mul_ceil(from_rate))
}

/// Rate guard for a move between two standard arks.
///
/// Passes when the target pays enough more, or when the move only sheds the
/// source's over-allocation (assets above its effective cap).
pub fn ensure_rate_improvement<AccountId: Clone>(
  to: &AccountId,
  amount: Balance,
  from_rate: u128,
  to_rate: u128,
  minimum: Permill,
  from_over_allocation: Balance,
) -> Result<(), FleetError<AccountId>> {
  if rate_improves(from_rate, to_rate, minimum) {
    return Ok(());
  }
  if from_over_allocation > 0 && amount <= from_over_allocation {
    return Ok(());
  }
  Err(FleetError::TargetRateTooLow {
    ark: to.clone(),
    to_rate,
    from_rate,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  type Error = FleetError<u64>;

  #[test]
  fn flows_accumulate_across_instructions() {
    let mut flows = FlowTracker::<u64>::default();
    assert_eq!(flows.record(&1, &2, 600, 1_000, 1_000), Ok(()));
    assert_eq!(flows.record(&3, &2, 300, 1_000, 1_000), Ok(()));
    assert_eq!(flows.inflow(&2), 900);
    assert_eq!(flows.outflow(&1), 600);
    assert_eq!(
      flows.record(&1, &4, 500, 1_000, 1_000),
      Err(Error::ExceedsMaxOutflow {
        ark: 1,
        cumulative: 1_100,
        limit: 1_000
      })
    );
  }

  #[test]
  fn outflow_is_checked_before_inflow() {
    let mut flows = FlowTracker::<u64>::default();
    assert_eq!(
      flows.record(&1, &2, 500, 100, 100),
      Err(Error::ExceedsMaxOutflow {
        ark: 1,
        cumulative: 500,
        limit: 100
      })
    );
  }

  #[test]
  fn inflow_limit_applies_to_target() {
    let mut flows = FlowTracker::<u64>::default();
    assert_eq!(
      flows.record(&1, &2, 500, Balance::MAX, 499),
      Err(Error::ExceedsMaxInflow {
        ark: 2,
        cumulative: 500,
        limit: 499
      })
    );
  }

  #[test]
  fn cooldown_boundary_is_inclusive() {
    assert_eq!(ensure_cooldown_elapsed::<u64>(1_000, 60, 1_060), Ok(()));
    assert_eq!(
      ensure_cooldown_elapsed::<u64>(1_000, 60, 1_059),
      Err(Error::CooldownNotElapsed {
        last: 1_000,
        cooldown: 60,
        now: 1_059
      })
    );
    // a clock behind the last batch never underflows
    assert!(ensure_cooldown_elapsed::<u64>(1_000, 1, 900).is_err());
  }

  #[test]
  fn operation_count_bounds() {
    assert_eq!(ensure_operation_count::<u64>(0, 10), Err(Error::NoOperations));
    assert_eq!(ensure_operation_count::<u64>(10, 10), Ok(()));
    assert_eq!(
      ensure_operation_count::<u64>(11, 10),
      Err(Error::TooManyOperations {
        count: 11,
        limit: 10
      })
    );
  }

  #[test]
  fn cap_check_reports_projection() {
    assert_eq!(ensure_within_cap(&7u64, 4_000, 1_000, 5_000), Ok(()));
    assert_eq!(
      ensure_within_cap(&7u64, 4_000, 2_000, 5_000),
      Err(Error::EffectiveDepositCapExceeded {
        ark: 7,
        projected: 6_000,
        cap: 5_000
      })
    );
  }

  #[test]
  fn buffer_funding_uses_excess_only() {
    assert_eq!(ensure_buffer_can_fund::<u64>(5_000, 15_000, 10_000), Ok(()));
    assert_eq!(
      ensure_buffer_can_fund::<u64>(1, 10_000, 10_000),
      Err(Error::NoExcessFunds)
    );
    assert_eq!(
      ensure_buffer_can_fund::<u64>(3_000, 12_000, 10_000),
      Err(Error::InsufficientBuffer {
        requested: 3_000,
        available: 2_000
      })
    );
    assert_eq!(buffer_excess(5_000, 10_000), 0);
  }

  #[test]
  fn rate_guard_requires_minimum_improvement() {
    let min = Permill::from_percent(10);
    assert!(rate_improves(1_000, 1_100, min));
    assert!(!rate_improves(1_000, 1_099, min));
    assert_eq!(ensure_rate_improvement(&2u64, 500, 1_000, 1_100, min, 0), Ok(()));
    assert_eq!(
      ensure_rate_improvement(&2u64, 500, 1_000, 1_050, min, 0),
      Err(Error::TargetRateTooLow {
        ark: 2,
        to_rate: 1_050,
        from_rate: 1_000
      })
    );
  }

  #[test]
  fn over_allocation_carve_out() {
    let min = Permill::from_percent(10);
    // lower rate target is fine while only shedding the excess
    assert_eq!(ensure_rate_improvement(&2u64, 300, 1_000, 900, min, 300), Ok(()));
    assert!(ensure_rate_improvement(&2u64, 301, 1_000, 900, min, 300).is_err());
    assert!(ensure_rate_improvement(&2u64, 1, 1_000, 900, min, 0).is_err());
  }
}
