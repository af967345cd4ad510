//! Rebalance and buffer adjustment engines.
//!
//! Both walk a batch in order with one shared [`FlowTracker`], validating each
//! instruction against live ark balances and executing it before looking at
//! the next one. Any failure aborts the whole extrinsic.

use alloc::vec::Vec;
use frame::deps::frame_support::ensure;
use frame::prelude::*;

use crate::{
  ArkAdapter, ArkRateOracle, LOG_TARGET,
  engine::{self, FlowTracker},
  pallet::*,
  types::{Balance, BatchKind, FleetError, RebalanceDataOf},
};

impl<T: Config> Pallet<T> {
  /// Validate and execute a batch, returning the total amount moved.
  pub(crate) fn do_rebalance(
    caller: T::AccountId,
    instructions: Vec<RebalanceDataOf<T>>,
    kind: BatchKind,
  ) -> Result<Balance, FleetError<T::AccountId>> {
    let now = Self::now();
    if kind.enforces_cooldown() {
      engine::ensure_cooldown_elapsed(
        LastRebalanceTimestamp::<T>::get(),
        RebalanceCooldown::<T>::get(),
        now,
      )?;
    }
    engine::ensure_operation_count(instructions.len(), MaxRebalanceOperations::<T>::get())?;

    let mut flows = FlowTracker::default();
    let mut total_moved: Balance = 0;
    for instruction in &instructions {
      let amount = match kind {
        BatchKind::AdjustBuffer => Self::validate_buffer_adjustment(instruction, &mut flows)?,
        BatchKind::Rebalance | BatchKind::ForceRebalance => {
          Self::validate_rebalance(instruction, &mut flows)?
        }
      };
      Self::reallocate(instruction, amount)?;
      total_moved = total_moved.saturating_add(amount);
    }

    if kind != BatchKind::ForceRebalance || T::ForceRebalanceAdvancesCooldown::get() {
      LastRebalanceTimestamp::<T>::put(now);
    }
    log::debug!(
      target: LOG_TARGET,
      "{:?} batch of {} moved {}",
      kind,
      instructions.len(),
      total_moved
    );
    match kind {
      BatchKind::AdjustBuffer => Self::deposit_event(Event::BufferAdjusted {
        keeper: caller,
        total_moved,
      }),
      BatchKind::Rebalance | BatchKind::ForceRebalance => Self::deposit_event(Event::Rebalanced {
        keeper: caller,
        instructions,
        forced: kind == BatchKind::ForceRebalance,
      }),
    }
    Ok(total_moved)
  }

  /// Checks for a move between two standard arks. Returns the resolved amount.
  fn validate_rebalance(
    instruction: &RebalanceDataOf<T>,
    flows: &mut FlowTracker<T::AccountId>,
  ) -> Result<Balance, FleetError<T::AccountId>> {
    let (from, to) = (&instruction.from_ark, &instruction.to_ark);
    Self::ensure_known_ark(from)?;
    Self::ensure_known_ark(to)?;

    let buffer = T::BufferArk::get();
    if *from == buffer || *to == buffer {
      ensure!(
        T::IntegratedBufferRebalance::get(),
        FleetError::CannotRebalanceBufferHere
      );
      return Self::validate_buffer_adjustment(instruction, flows);
    }

    ensure!(
      from != to,
      FleetError::CannotRebalanceToSameArk { ark: to.clone() }
    );
    let fleet_assets = Self::total_assets();
    let to_config = Self::ark_config(to)?;
    let to_cap = to_config.effective_cap(fleet_assets);
    ensure!(to_cap > 0, FleetError::ArkCapZero { ark: to.clone() });

    let from_assets = T::Arks::total_assets(from);
    let amount = if instruction.is_max() {
      from_assets
    } else {
      instruction.amount
    };
    ensure!(amount > 0, FleetError::AmountZero { ark: to.clone() });

    let from_config = Self::ark_config(from)?;
    flows.record(
      from,
      to,
      amount,
      from_config.max_rebalance_outflow,
      to_config.max_rebalance_inflow,
    )?;
    engine::ensure_within_cap(to, T::Arks::total_assets(to), amount, to_cap)?;

    if let Some(minimum) = MinimumRateDifference::<T>::get() {
      if let (Some(from_rate), Some(to_rate)) = (T::RateOracle::rate(from), T::RateOracle::rate(to))
      {
        let over_allocation = from_assets.saturating_sub(from_config.effective_cap(fleet_assets));
        engine::ensure_rate_improvement(to, amount, from_rate, to_rate, minimum, over_allocation)?;
      }
    }
    Ok(amount)
  }

  /// Checks for a move with the buffer on exactly one side. Returns the
  /// resolved amount.
  fn validate_buffer_adjustment(
    instruction: &RebalanceDataOf<T>,
    flows: &mut FlowTracker<T::AccountId>,
  ) -> Result<Balance, FleetError<T::AccountId>> {
    let (from, to) = (&instruction.from_ark, &instruction.to_ark);
    Self::ensure_known_ark(from)?;
    Self::ensure_known_ark(to)?;

    let buffer = T::BufferArk::get();
    ensure!(
      (*from == buffer) != (*to == buffer),
      FleetError::InvalidBufferAdjustment
    );
    let fleet_assets = Self::total_assets();

    if *from == buffer {
      let to_config = Self::ark_config(to)?;
      let to_cap = to_config.effective_cap(fleet_assets);
      ensure!(to_cap > 0, FleetError::ArkCapZero { ark: to.clone() });
      ensure!(!instruction.is_max(), FleetError::CannotUseMaxFromBuffer);
      let amount = instruction.amount;
      ensure!(amount > 0, FleetError::AmountZero { ark: to.clone() });
      engine::ensure_buffer_can_fund(
        amount,
        T::Arks::total_assets(&buffer),
        MinimumBufferBalance::<T>::get(),
      )?;
      flows.record(
        from,
        to,
        amount,
        Balance::MAX,
        to_config.max_rebalance_inflow,
      )?;
      engine::ensure_within_cap(to, T::Arks::total_assets(to), amount, to_cap)?;
      Ok(amount)
    } else {
      let from_config = Self::ark_config(from)?;
      let amount = if instruction.is_max() {
        T::Arks::total_assets(from)
      } else {
        instruction.amount
      };
      ensure!(amount > 0, FleetError::AmountZero { ark: to.clone() });
      flows.record(
        from,
        to,
        amount,
        from_config.max_rebalance_outflow,
        Balance::MAX,
      )?;
      Ok(amount)
    }
  }

  /// Disembark from the source into custody, then board the target.
  fn reallocate(
    instruction: &RebalanceDataOf<T>,
    amount: Balance,
  ) -> Result<(), FleetError<T::AccountId>> {
    let custody = Self::account_id();
    T::Arks::disembark(
      &instruction.from_ark,
      &custody,
      amount,
      &instruction.disembark_data,
    )?;
    T::Arks::board(&instruction.to_ark, &custody, amount, &instruction.board_data)?;
    Self::deposit_event(Event::Reallocated {
      from_ark: instruction.from_ark.clone(),
      to_ark: instruction.to_ark.clone(),
      amount,
    });
    Ok(())
  }

  fn ensure_known_ark(ark: &T::AccountId) -> Result<(), FleetError<T::AccountId>> {
    ensure!(
      Self::is_active_or_buffer(ark),
      FleetError::ArkNotFound { ark: ark.clone() }
    );
    Ok(())
  }
}
