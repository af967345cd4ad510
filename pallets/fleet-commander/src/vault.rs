//! Vault accounting and the withdrawal router.
//!
//! Shares follow ERC4626 with one virtual share and one virtual asset, so an
//! empty vault prices shares at par and donations cannot inflate the first
//! depositor's price to zero.

use alloc::{vec, vec::Vec};
use frame::deps::frame_support::{ensure, traits::tokens::Preservation};
use frame::deps::frame_support::traits::fungible::Mutate;
use frame::prelude::*;
use sp_arithmetic::{helpers_128bit::multiply_by_rational_with_rounding, per_things::Rounding};

use crate::{
  ArkAdapter,
  pallet::*,
  types::{Balance, FleetError, WithdrawalRoute},
};

impl<T: Config> Pallet<T> {
  /// Buffer plus every active ark, read live from the adapters.
  pub fn total_assets() -> Balance {
    ActiveArks::<T>::get()
      .iter()
      .fold(T::Arks::total_assets(&T::BufferArk::get()), |total, ark| {
        total.saturating_add(T::Arks::total_assets(ark))
      })
  }

  pub fn convert_to_shares(
    assets: Balance,
    rounding: Rounding,
  ) -> Result<Balance, FleetError<T::AccountId>> {
    multiply_by_rational_with_rounding(
      assets,
      TotalShares::<T>::get().saturating_add(1),
      Self::total_assets().saturating_add(1),
      rounding,
    )
    .ok_or(FleetError::Overflow)
  }

  pub fn convert_to_assets(
    shares: Balance,
    rounding: Rounding,
  ) -> Result<Balance, FleetError<T::AccountId>> {
    multiply_by_rational_with_rounding(
      shares,
      Self::total_assets().saturating_add(1),
      TotalShares::<T>::get().saturating_add(1),
      rounding,
    )
    .ok_or(FleetError::Overflow)
  }

  /// Room left under the vault deposit cap.
  pub fn max_deposit() -> Balance {
    DepositCap::<T>::get().saturating_sub(Self::total_assets())
  }

  /// Assets `owner`'s shares are worth, rounded down.
  pub fn max_withdraw(owner: &T::AccountId) -> Result<Balance, FleetError<T::AccountId>> {
    Self::convert_to_assets(ShareBalances::<T>::get(owner), Rounding::Down)
  }

  /// What `owner` can take out of the buffer alone.
  pub fn max_buffer_withdraw(owner: &T::AccountId) -> Result<Balance, FleetError<T::AccountId>> {
    let buffer_assets = T::Arks::total_assets(&T::BufferArk::get());
    Ok(Self::max_withdraw(owner)?.min(buffer_assets))
  }

  pub fn max_redeem(owner: &T::AccountId) -> Balance {
    ShareBalances::<T>::get(owner)
  }

  /// Buffer first, then active arks in registry order, limited to
  /// `MaxWithdrawalOperations` entries. Arks reporting nothing withdrawable
  /// are skipped and do not count towards the limit.
  pub fn withdrawal_sources() -> Vec<(T::AccountId, Balance)> {
    let buffer = T::BufferArk::get();
    core::iter::once(buffer)
      .chain(ActiveArks::<T>::get())
      .map(|ark| {
        let available = T::Arks::withdrawable_assets(&ark);
        (ark, available)
      })
      .filter(|(_, available)| *available > 0)
      .take(MaxWithdrawalOperations::<T>::get() as usize)
      .collect()
  }

  pub(crate) fn do_deposit(
    caller: T::AccountId,
    assets: Balance,
    receiver: T::AccountId,
  ) -> Result<Balance, FleetError<T::AccountId>> {
    ensure!(assets > 0, FleetError::ZeroAssets);
    Self::ensure_deposit_room(&receiver, assets)?;
    let shares = Self::convert_to_shares(assets, Rounding::Down)?;
    ensure!(shares > 0, FleetError::ZeroShares);
    Self::board_buffer(&caller, assets)?;
    Self::mint_shares(&receiver, shares)?;
    Self::deposit_event(Event::Deposit {
      sender: caller,
      owner: receiver,
      assets,
      shares,
    });
    Ok(shares)
  }

  pub(crate) fn do_mint(
    caller: T::AccountId,
    shares: Balance,
    receiver: T::AccountId,
  ) -> Result<Balance, FleetError<T::AccountId>> {
    ensure!(shares > 0, FleetError::ZeroShares);
    let assets = Self::convert_to_assets(shares, Rounding::Up)?;
    ensure!(assets > 0, FleetError::ZeroAssets);
    Self::ensure_deposit_room(&receiver, assets)?;
    Self::board_buffer(&caller, assets)?;
    Self::mint_shares(&receiver, shares)?;
    Self::deposit_event(Event::Deposit {
      sender: caller,
      owner: receiver,
      assets,
      shares,
    });
    Ok(assets)
  }

  /// Withdraw exactly `assets`, burning the shares they are worth (rounded up).
  pub(crate) fn do_withdraw(
    caller: T::AccountId,
    assets: Balance,
    receiver: T::AccountId,
    owner: T::AccountId,
    route: WithdrawalRoute,
  ) -> Result<Balance, FleetError<T::AccountId>> {
    ensure!(assets > 0, FleetError::ZeroAssets);
    let shares = Self::convert_to_shares(assets, Rounding::Up)?;
    Self::ensure_can_spend(&caller, &owner, shares)?;
    let plan = Self::plan_withdrawal(&owner, assets, route)?;
    Self::execute_withdrawal(caller, receiver, owner, assets, shares, plan)?;
    Ok(shares)
  }

  /// Burn exactly `shares` for the assets they are worth (rounded down).
  pub(crate) fn do_redeem(
    caller: T::AccountId,
    shares: Balance,
    receiver: T::AccountId,
    owner: T::AccountId,
  ) -> Result<Balance, FleetError<T::AccountId>> {
    ensure!(shares > 0, FleetError::ZeroShares);
    Self::ensure_can_spend(&caller, &owner, shares)?;
    let max = Self::max_redeem(&owner);
    ensure!(
      shares <= max,
      FleetError::ExceededMaxRedeem {
        owner,
        requested: shares,
        max
      }
    );
    let assets = Self::convert_to_assets(shares, Rounding::Down)?;
    ensure!(assets > 0, FleetError::ZeroAssets);
    let plan = Self::plan_withdrawal(&owner, assets, WithdrawalRoute::Auto)?;
    Self::execute_withdrawal(caller, receiver, owner, assets, shares, plan)?;
    Ok(assets)
  }

  /// Sources and amounts covering `assets` along `route`.
  fn plan_withdrawal(
    owner: &T::AccountId,
    assets: Balance,
    route: WithdrawalRoute,
  ) -> Result<Vec<(T::AccountId, Balance)>, FleetError<T::AccountId>> {
    let max_from_buffer = Self::max_buffer_withdraw(owner)?;
    let from_buffer = match route {
      WithdrawalRoute::Buffer => true,
      WithdrawalRoute::Arks => false,
      WithdrawalRoute::Auto => assets <= max_from_buffer,
    };
    if from_buffer {
      ensure!(
        assets <= max_from_buffer,
        FleetError::ExceededMaxWithdraw {
          owner: owner.clone(),
          requested: assets,
          max: max_from_buffer,
        }
      );
      return Ok(vec![(T::BufferArk::get(), assets)]);
    }

    let sources = Self::withdrawal_sources();
    let withdrawable = sources
      .iter()
      .fold(0, |total: Balance, (_, available)| total.saturating_add(*available));
    let achievable = Self::max_withdraw(owner)?.min(withdrawable);
    ensure!(
      assets <= achievable,
      FleetError::ExceededMaxWithdraw {
        owner: owner.clone(),
        requested: assets,
        max: achievable,
      }
    );

    let mut remaining = assets;
    let mut plan = Vec::new();
    for (ark, available) in sources {
      if remaining == 0 {
        break;
      }
      let take = available.min(remaining);
      remaining = remaining.saturating_sub(take);
      plan.push((ark, take));
    }
    Ok(plan)
  }

  fn execute_withdrawal(
    caller: T::AccountId,
    receiver: T::AccountId,
    owner: T::AccountId,
    assets: Balance,
    shares: Balance,
    plan: Vec<(T::AccountId, Balance)>,
  ) -> Result<(), FleetError<T::AccountId>> {
    Self::spend_allowance(&caller, &owner, shares);
    Self::burn_shares(&owner, shares)?;
    let custody = Self::account_id();
    for (ark, amount) in plan {
      T::Arks::disembark(&ark, &custody, amount, &[])?;
    }
    T::Currency::transfer(&custody, &receiver, assets, Preservation::Expendable)?;
    Self::deposit_event(Event::Withdraw {
      sender: caller,
      receiver,
      owner,
      assets,
      shares,
    });
    Ok(())
  }

  fn ensure_deposit_room(
    receiver: &T::AccountId,
    assets: Balance,
  ) -> Result<(), FleetError<T::AccountId>> {
    let max = Self::max_deposit();
    ensure!(
      assets <= max,
      FleetError::ExceededMaxDeposit {
        receiver: receiver.clone(),
        requested: assets,
        max,
      }
    );
    Ok(())
  }

  /// Pull `assets` from `who` into custody and board them into the buffer.
  fn board_buffer(who: &T::AccountId, assets: Balance) -> Result<(), FleetError<T::AccountId>> {
    let custody = Self::account_id();
    T::Currency::transfer(who, &custody, assets, Preservation::Expendable)?;
    T::Arks::board(&T::BufferArk::get(), &custody, assets, &[])?;
    Ok(())
  }

  fn ensure_can_spend(
    caller: &T::AccountId,
    owner: &T::AccountId,
    shares: Balance,
  ) -> Result<(), FleetError<T::AccountId>> {
    ensure!(
      caller == owner || ShareAllowances::<T>::get(owner, caller) >= shares,
      FleetError::UnauthorizedWithdrawal {
        caller: caller.clone(),
        owner: owner.clone(),
      }
    );
    Ok(())
  }

  fn spend_allowance(caller: &T::AccountId, owner: &T::AccountId, shares: Balance) {
    if caller != owner {
      ShareAllowances::<T>::mutate(owner, caller, |allowance| {
        *allowance = allowance.saturating_sub(shares)
      });
    }
  }

  fn mint_shares(who: &T::AccountId, shares: Balance) -> Result<(), FleetError<T::AccountId>> {
    let total = TotalShares::<T>::get()
      .checked_add(shares)
      .ok_or(FleetError::Overflow)?;
    TotalShares::<T>::put(total);
    ShareBalances::<T>::mutate(who, |balance| *balance = balance.saturating_add(shares));
    Ok(())
  }

  fn burn_shares(who: &T::AccountId, shares: Balance) -> Result<(), FleetError<T::AccountId>> {
    let balance = ShareBalances::<T>::get(who);
    let remaining = balance
      .checked_sub(shares)
      .ok_or_else(|| FleetError::InsufficientShares {
        owner: who.clone(),
        requested: shares,
        balance,
      })?;
    ShareBalances::<T>::insert(who, remaining);
    TotalShares::<T>::mutate(|total| *total = total.saturating_sub(shares));
    Ok(())
  }
}
