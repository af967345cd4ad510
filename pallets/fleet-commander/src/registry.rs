//! Ark registry: membership, per-ark configuration and effective caps.

use alloc::vec::Vec;
use codec::Encode;
use frame::deps::{frame_support::ensure, sp_runtime::traits::AccountIdConversion};
use frame::prelude::*;

use crate::{
  ArkAdapter,
  pallet::*,
  types::{ArkConfig, ArkKind, Balance, FleetError},
};

impl<T: Config> Pallet<T> {
  /// Custody account that holds assets between the two legs of a move.
  pub fn account_id() -> T::AccountId {
    T::PalletId::get().into_account_truncating()
  }

  pub fn buffer_ark() -> T::AccountId {
    T::BufferArk::get()
  }

  /// Active arks in registry order, buffer excluded.
  pub fn active_arks() -> Vec<T::AccountId> {
    ActiveArks::<T>::get().into_inner()
  }

  pub fn is_active_or_buffer(ark: &T::AccountId) -> bool {
    *ark == T::BufferArk::get() || ArkConfigs::<T>::contains_key(ark)
  }

  pub fn ark_kind(ark: &T::AccountId) -> Option<ArkKind> {
    if *ark == T::BufferArk::get() {
      Some(ArkKind::Buffer)
    } else if ArkConfigs::<T>::contains_key(ark) {
      Some(ArkKind::Standard)
    } else {
      None
    }
  }

  /// Configuration of an active ark, or the buffer's implicit one.
  pub fn ark_config(ark: &T::AccountId) -> Result<ArkConfig, FleetError<T::AccountId>> {
    if *ark == T::BufferArk::get() {
      return Ok(ArkConfig::buffer());
    }
    ArkConfigs::<T>::get(ark).ok_or_else(|| FleetError::ArkNotFound { ark: ark.clone() })
  }

  /// Lesser of the ark's absolute cap and its share of total assets.
  ///
  /// Zero for accounts that are not arks.
  pub fn effective_deposit_cap(ark: &T::AccountId) -> Balance {
    Self::ark_config(ark)
      .map(|config| config.effective_cap(Self::total_assets()))
      .unwrap_or_default()
  }

  pub(crate) fn do_add_ark(ark: T::AccountId) -> Result<(), FleetError<T::AccountId>> {
    ensure!(!Self::is_null_account(&ark), FleetError::InvalidArkAddress);
    ensure!(
      !Self::is_active_or_buffer(&ark),
      FleetError::DuplicateArk { ark }
    );
    ActiveArks::<T>::try_mutate(|arks| arks.try_push(ark.clone()))
      .map_err(|_| FleetError::TooManyArks)?;
    ArkConfigs::<T>::insert(&ark, ArkConfig::unconfigured());
    Self::deposit_event(Event::ArkAdded { ark });
    Ok(())
  }

  /// Arks leave only once closed for inflow and fully drained.
  pub(crate) fn do_remove_ark(ark: T::AccountId) -> Result<(), FleetError<T::AccountId>> {
    ensure!(ark != T::BufferArk::get(), FleetError::CannotRemoveBuffer);
    let config =
      ArkConfigs::<T>::get(&ark).ok_or_else(|| FleetError::ArkNotFound { ark: ark.clone() })?;
    ensure!(
      config.deposit_cap.is_zero(),
      FleetError::ArkCapNotZero {
        ark,
        cap: config.deposit_cap
      }
    );
    let balance = T::Arks::total_assets(&ark);
    ensure!(
      balance.is_zero(),
      FleetError::ArkBalanceNotZero { ark, balance }
    );
    ArkConfigs::<T>::remove(&ark);
    ActiveArks::<T>::mutate(|arks| arks.retain(|active| *active != ark));
    Self::deposit_event(Event::ArkRemoved { ark });
    Ok(())
  }

  /// Apply `update` to a registered ark's configuration.
  ///
  /// The buffer has no stored configuration and is reported as not found.
  pub(crate) fn update_ark_config(
    ark: &T::AccountId,
    update: impl FnOnce(&mut ArkConfig),
  ) -> Result<ArkConfig, FleetError<T::AccountId>> {
    ArkConfigs::<T>::try_mutate(ark, |maybe_config| {
      let config = maybe_config
        .as_mut()
        .ok_or_else(|| FleetError::ArkNotFound { ark: ark.clone() })?;
      update(config);
      Ok(*config)
    })
  }

  /// The all-zero account stands for "no ark".
  fn is_null_account(ark: &T::AccountId) -> bool {
    ark.using_encoded(|bytes| bytes.iter().all(|byte| *byte == 0))
  }
}
