//! Keeper planning helpers.
//!
//! Read-only: they build instructions a keeper can submit through
//! `rebalance`, but never move funds themselves.

use alloc::{collections::VecDeque, vec::Vec};

use crate::{
  ArkAdapter, ArkRateOracle,
  engine,
  pallet::*,
  types::{Balance, RebalanceDataOf},
};

/// The last `capacity` observations of which ark paid the best rate.
///
/// A keeper only acts once the same ark has stayed on top for the whole
/// window, which filters out rate spikes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TopArkWindow<AccountId> {
  observations: VecDeque<AccountId>,
  capacity: usize,
}

impl<AccountId: Clone + PartialEq> TopArkWindow<AccountId> {
  pub fn new(capacity: u32) -> Self {
    let capacity = capacity.max(1) as usize;
    Self {
      observations: VecDeque::with_capacity(capacity),
      capacity,
    }
  }

  /// Record the current top ark, evicting the oldest observation when full.
  pub fn observe(&mut self, top: AccountId) {
    if self.observations.len() == self.capacity {
      self.observations.pop_front();
    }
    self.observations.push_back(top);
  }

  /// Most recent observation.
  pub fn latest(&self) -> Option<&AccountId> {
    self.observations.back()
  }

  pub fn is_full(&self) -> bool {
    self.observations.len() == self.capacity
  }

  /// Full window with a single ark in every slot.
  pub fn is_stable(&self) -> bool {
    match self.observations.front() {
      Some(first) => self.is_full() && self.observations.iter().all(|top| top == first),
      None => false,
    }
  }

  pub fn clear(&mut self) {
    self.observations.clear();
  }
}

impl<T: Config> Pallet<T> {
  /// Active arks that report a rate, best first. Ties keep registry order.
  pub fn ranked_arks() -> Vec<(T::AccountId, u128)> {
    let mut ranked: Vec<_> = ActiveArks::<T>::get()
      .into_iter()
      .filter_map(|ark| T::RateOracle::rate(&ark).map(|rate| (ark, rate)))
      .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
  }

  /// Instructions moving every other ranked ark's balance above `dust` into
  /// the top ark.
  ///
  /// Each move is sized to fit the source's outflow limit and what is left
  /// of the top ark's inflow limit and cap headroom, and moves that would
  /// fail the rate guard are left out. The plan never exceeds the batch
  /// length limit.
  pub fn plan_rate_rebalance(dust: Balance) -> Vec<RebalanceDataOf<T>> {
    let ranked = Self::ranked_arks();
    let Some((top, top_rate)) = ranked.first().cloned() else {
      return Vec::new();
    };
    let Ok(top_config) = Self::ark_config(&top) else {
      return Vec::new();
    };
    let minimum = MinimumRateDifference::<T>::get();
    let mut headroom = top_config
      .effective_cap(Self::total_assets())
      .saturating_sub(T::Arks::total_assets(&top));
    let mut inflow_left = top_config.max_rebalance_inflow;
    let limit = MaxRebalanceOperations::<T>::get() as usize;

    let mut plan = Vec::new();
    for (ark, rate) in ranked.into_iter().skip(1) {
      if plan.len() >= limit || headroom == 0 || inflow_left == 0 {
        break;
      }
      let balance = T::Arks::total_assets(&ark);
      if balance <= dust {
        continue;
      }
      if let Some(minimum) = minimum {
        if !engine::rate_improves(rate, top_rate, minimum) {
          continue;
        }
      }
      let outflow_limit = Self::ark_config(&ark)
        .map(|config| config.max_rebalance_outflow)
        .unwrap_or_default();
      let amount = balance.min(outflow_limit).min(inflow_left).min(headroom);
      if amount == 0 {
        continue;
      }
      headroom = headroom.saturating_sub(amount);
      inflow_left = inflow_left.saturating_sub(amount);
      plan.push(RebalanceDataOf::<T>::new(ark, top.clone(), amount));
    }
    plan
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use primitives::params::KEEPER_RATE_WINDOW;

  #[test]
  fn window_is_stable_only_when_full_and_uniform() {
    let mut window = TopArkWindow::new(3);
    assert!(!window.is_stable());
    window.observe(1u64);
    window.observe(1);
    assert!(!window.is_stable());
    window.observe(1);
    assert!(window.is_stable());
    window.observe(2);
    assert!(!window.is_stable());
    assert_eq!(window.latest(), Some(&2));
  }

  #[test]
  fn window_recovers_after_top_settles() {
    let mut window = TopArkWindow::new(KEEPER_RATE_WINDOW);
    window.observe(7u64);
    for _ in 0..KEEPER_RATE_WINDOW - 1 {
      window.observe(9);
    }
    assert!(window.is_full());
    assert!(!window.is_stable());
    window.observe(9);
    assert!(window.is_stable());
    window.clear();
    assert!(!window.is_stable());
  }
}
