#![cfg(feature = "runtime-benchmarks")]

extern crate alloc;

use crate::*;
use alloc::vec::Vec;
use frame::deps::sp_runtime::Permill;
use polkadot_sdk::frame_benchmarking::{account, v2::*};
use polkadot_sdk::frame_support::traits::{EnsureOrigin, Get};
use polkadot_sdk::frame_system::RawOrigin;

const SEED: u32 = 0;
const FUNDING: Balance = 1_000_000_000;
const VAULT_DEPOSIT: Balance = 100_000_000;
const ARK_CAP: Balance = 1_000_000_000_000;
const STEP: Balance = 1_000;

#[benchmarks]
mod benches {
  use super::*;

  /// Fresh registry of `count` open arks with every timing and size limit relaxed.
  fn setup_fleet<T: Config>(count: u32) -> Result<Vec<T::AccountId>, BenchmarkError> {
    let _ = ArkConfigs::<T>::clear(u32::MAX, None);
    ActiveArks::<T>::kill();
    RebalanceCooldown::<T>::put(0);
    LastRebalanceTimestamp::<T>::put(0);
    MaxRebalanceOperations::<T>::put(T::MaxRebalanceOperationsLimit::get());
    MaxWithdrawalOperations::<T>::put(T::MaxArks::get().saturating_add(1));
    DepositCap::<T>::put(Balance::MAX);
    MinimumBufferBalance::<T>::put(0);
    MinimumRateDifference::<T>::kill();

    (0..count)
      .map(|index| {
        let ark = T::BenchmarkHelper::ark(index);
        Pallet::<T>::do_add_ark(ark.clone()).map_err(|_| BenchmarkError::Stop("add ark"))?;
        ArkConfigs::<T>::insert(
          &ark,
          ArkConfig {
            deposit_cap: ARK_CAP,
            ..ArkConfig::unconfigured()
          },
        );
        Ok(ark)
      })
      .collect()
  }

  fn funded<T: Config>(name: &'static str) -> Result<T::AccountId, BenchmarkError> {
    let who: T::AccountId = account(name, 0, SEED);
    T::BenchmarkHelper::fund_account(&who, FUNDING)
      .map_err(|_| BenchmarkError::Stop("fund account"))?;
    Ok(who)
  }

  /// Depositor whose `VAULT_DEPOSIT` sits in the buffer.
  fn setup_depositor<T: Config>() -> Result<T::AccountId, BenchmarkError> {
    let depositor = funded::<T>("depositor")?;
    Pallet::<T>::do_deposit(depositor.clone(), VAULT_DEPOSIT, depositor.clone())
      .map_err(|_| BenchmarkError::Stop("deposit"))?;
    Ok(depositor)
  }

  /// Move buffer funds into arks without leaving a cooldown behind.
  fn fill_arks<T: Config>(moves: Vec<(T::AccountId, Balance)>) -> Result<(), BenchmarkError> {
    let buffer = T::BufferArk::get();
    let instructions = moves
      .into_iter()
      .map(|(ark, amount)| RebalanceDataOf::<T>::new(buffer.clone(), ark, amount))
      .collect();
    Pallet::<T>::do_rebalance(buffer, instructions, BatchKind::AdjustBuffer)
      .map_err(|_| BenchmarkError::Stop("fill arks"))?;
    LastRebalanceTimestamp::<T>::put(0);
    Ok(())
  }

  fn ark_to_ark_batch<T: Config>(
    n: u32,
  ) -> Result<(T::AccountId, Vec<RebalanceDataOf<T>>), BenchmarkError> {
    let arks = setup_fleet::<T>(2)?;
    let (from, to) = (arks[0].clone(), arks[1].clone());
    setup_depositor::<T>()?;
    fill_arks::<T>(alloc::vec![(from.clone(), STEP.saturating_mul(n.into()))])?;
    let instructions = (0..n)
      .map(|_| RebalanceDataOf::<T>::new(from.clone(), to.clone(), STEP))
      .collect();
    Ok((to, instructions))
  }

  #[benchmark]
  fn rebalance(n: Linear<1, { T::MaxRebalanceOperationsLimit::get() }>) -> Result<(), BenchmarkError> {
    let (to, instructions) = ark_to_ark_batch::<T>(n)?;
    let origin = T::KeeperOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

    #[extrinsic_call]
    rebalance(origin as T::RuntimeOrigin, instructions);

    assert_eq!(T::Arks::total_assets(&to), STEP.saturating_mul(n.into()));
    Ok(())
  }

  #[benchmark]
  fn force_rebalance(
    n: Linear<1, { T::MaxRebalanceOperationsLimit::get() }>,
  ) -> Result<(), BenchmarkError> {
    let (to, instructions) = ark_to_ark_batch::<T>(n)?;
    let origin =
      T::GovernorOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

    #[extrinsic_call]
    force_rebalance(origin as T::RuntimeOrigin, instructions);

    assert_eq!(T::Arks::total_assets(&to), STEP.saturating_mul(n.into()));
    Ok(())
  }

  #[benchmark]
  fn adjust_buffer(
    n: Linear<1, { T::MaxRebalanceOperationsLimit::get() }>,
  ) -> Result<(), BenchmarkError> {
    let arks = setup_fleet::<T>(1)?;
    let ark = arks[0].clone();
    setup_depositor::<T>()?;
    let buffer = T::BufferArk::get();
    let instructions = (0..n)
      .map(|_| RebalanceDataOf::<T>::new(buffer.clone(), ark.clone(), STEP))
      .collect();
    let origin = T::KeeperOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

    #[extrinsic_call]
    adjust_buffer(origin as T::RuntimeOrigin, instructions);

    assert_eq!(T::Arks::total_assets(&ark), STEP.saturating_mul(n.into()));
    Ok(())
  }

  #[benchmark]
  fn add_ark() -> Result<(), BenchmarkError> {
    setup_fleet::<T>(0)?;
    let ark = T::BenchmarkHelper::ark(0);
    let origin =
      T::GovernorOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

    #[extrinsic_call]
    add_ark(origin as T::RuntimeOrigin, ark.clone());

    assert!(ActiveArks::<T>::get().contains(&ark));
    Ok(())
  }

  #[benchmark]
  fn remove_ark() -> Result<(), BenchmarkError> {
    let arks = setup_fleet::<T>(1)?;
    let ark = arks[0].clone();
    ArkConfigs::<T>::mutate(&ark, |config| {
      if let Some(config) = config {
        config.deposit_cap = 0;
      }
    });
    let origin =
      T::GovernorOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

    #[extrinsic_call]
    remove_ark(origin as T::RuntimeOrigin, ark.clone());

    assert!(!ArkConfigs::<T>::contains_key(&ark));
    Ok(())
  }

  #[benchmark]
  fn set_ark_deposit_cap() -> Result<(), BenchmarkError> {
    let arks = setup_fleet::<T>(1)?;
    let origin = T::CuratorOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

    #[extrinsic_call]
    set_ark_deposit_cap(origin as T::RuntimeOrigin, arks[0].clone(), 5_000);

    Ok(())
  }

  #[benchmark]
  fn set_ark_max_deposit_percentage_of_tvl() -> Result<(), BenchmarkError> {
    let arks = setup_fleet::<T>(1)?;
    let origin = T::CuratorOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

    #[extrinsic_call]
    set_ark_max_deposit_percentage_of_tvl(
      origin as T::RuntimeOrigin,
      arks[0].clone(),
      Some(Permill::from_percent(20)),
    );

    Ok(())
  }

  #[benchmark]
  fn set_ark_max_rebalance_inflow() -> Result<(), BenchmarkError> {
    let arks = setup_fleet::<T>(1)?;
    let origin = T::CuratorOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

    #[extrinsic_call]
    set_ark_max_rebalance_inflow(origin as T::RuntimeOrigin, arks[0].clone(), 5_000);

    Ok(())
  }

  #[benchmark]
  fn set_ark_max_rebalance_outflow() -> Result<(), BenchmarkError> {
    let arks = setup_fleet::<T>(1)?;
    let origin = T::CuratorOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

    #[extrinsic_call]
    set_ark_max_rebalance_outflow(origin as T::RuntimeOrigin, arks[0].clone(), 5_000);

    Ok(())
  }

  #[benchmark]
  fn set_minimum_buffer_balance() -> Result<(), BenchmarkError> {
    let origin = T::CuratorOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

    #[extrinsic_call]
    set_minimum_buffer_balance(origin as T::RuntimeOrigin, 1_000);

    assert_eq!(MinimumBufferBalance::<T>::get(), 1_000);
    Ok(())
  }

  #[benchmark]
  fn update_rebalance_cooldown() -> Result<(), BenchmarkError> {
    let origin =
      T::GovernorOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

    #[extrinsic_call]
    update_rebalance_cooldown(origin as T::RuntimeOrigin, 60);

    assert_eq!(RebalanceCooldown::<T>::get(), 60);
    Ok(())
  }

  #[benchmark]
  fn set_max_rebalance_operations() -> Result<(), BenchmarkError> {
    let origin = T::CuratorOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

    #[extrinsic_call]
    set_max_rebalance_operations(origin as T::RuntimeOrigin, 1);

    assert_eq!(MaxRebalanceOperations::<T>::get(), 1);
    Ok(())
  }

  #[benchmark]
  fn set_minimum_rate_difference() -> Result<(), BenchmarkError> {
    let origin =
      T::GovernorOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

    #[extrinsic_call]
    set_minimum_rate_difference(origin as T::RuntimeOrigin, Some(Permill::from_percent(5)));

    assert_eq!(
      MinimumRateDifference::<T>::get(),
      Some(Permill::from_percent(5))
    );
    Ok(())
  }

  #[benchmark]
  fn set_deposit_cap() -> Result<(), BenchmarkError> {
    let origin = T::CuratorOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

    #[extrinsic_call]
    set_deposit_cap(origin as T::RuntimeOrigin, VAULT_DEPOSIT);

    assert_eq!(DepositCap::<T>::get(), VAULT_DEPOSIT);
    Ok(())
  }

  #[benchmark]
  fn set_max_withdrawal_operations() -> Result<(), BenchmarkError> {
    let origin = T::CuratorOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

    #[extrinsic_call]
    set_max_withdrawal_operations(origin as T::RuntimeOrigin, 1);

    assert_eq!(MaxWithdrawalOperations::<T>::get(), 1);
    Ok(())
  }

  #[benchmark]
  fn deposit() -> Result<(), BenchmarkError> {
    setup_fleet::<T>(0)?;
    let caller = funded::<T>("caller")?;

    #[extrinsic_call]
    deposit(RawOrigin::Signed(caller.clone()), VAULT_DEPOSIT, caller.clone());

    assert_eq!(ShareBalances::<T>::get(&caller), VAULT_DEPOSIT);
    Ok(())
  }

  #[benchmark]
  fn mint() -> Result<(), BenchmarkError> {
    setup_fleet::<T>(0)?;
    let caller = funded::<T>("caller")?;

    #[extrinsic_call]
    mint(RawOrigin::Signed(caller.clone()), VAULT_DEPOSIT, caller.clone());

    assert_eq!(ShareBalances::<T>::get(&caller), VAULT_DEPOSIT);
    Ok(())
  }

  #[benchmark]
  fn withdraw_from_buffer() -> Result<(), BenchmarkError> {
    setup_fleet::<T>(0)?;
    let depositor = setup_depositor::<T>()?;

    #[extrinsic_call]
    withdraw_from_buffer(
      RawOrigin::Signed(depositor.clone()),
      STEP,
      depositor.clone(),
      depositor.clone(),
    );

    assert_eq!(ShareBalances::<T>::get(&depositor), VAULT_DEPOSIT - STEP);
    Ok(())
  }

  /// Drains the buffer and `n` arks in a single withdrawal.
  #[benchmark]
  fn withdraw_from_arks(n: Linear<1, { T::MaxArks::get() }>) -> Result<(), BenchmarkError> {
    let arks = setup_fleet::<T>(n)?;
    let depositor = setup_depositor::<T>()?;
    fill_arks::<T>(arks.iter().cloned().map(|ark| (ark, STEP)).collect())?;

    #[extrinsic_call]
    withdraw_from_arks(
      RawOrigin::Signed(depositor.clone()),
      VAULT_DEPOSIT,
      depositor.clone(),
      depositor.clone(),
    );

    assert_eq!(ShareBalances::<T>::get(&depositor), 0);
    assert!(arks.iter().all(|ark| T::Arks::total_assets(ark) == 0));
    Ok(())
  }

  #[benchmark]
  fn approve() -> Result<(), BenchmarkError> {
    let owner: T::AccountId = account("owner", 0, SEED);
    let spender: T::AccountId = account("spender", 0, SEED);

    #[extrinsic_call]
    approve(RawOrigin::Signed(owner.clone()), spender.clone(), STEP);

    assert_eq!(ShareAllowances::<T>::get(&owner, &spender), STEP);
    Ok(())
  }

  #[cfg(test)]
  use crate::mock::{Test, new_test_ext};
  #[cfg(test)]
  impl_benchmark_test_suite!(Pallet, new_test_ext(), Test);
}
