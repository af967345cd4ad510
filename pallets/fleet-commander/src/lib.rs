//! Fleet Commander Pallet
//!
//! ERC4626-style vault that pools deposits in a buffer ark and lets a keeper
//! reallocate them across yield-bearing arks. Every move is bounded by
//! per-ark caps and flow limits, a minimum buffer balance and a cooldown
//! between keeper batches.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub use pallet::*;

pub mod adapters;
pub use adapters::{ArkAdapter, ArkRateOracle};

pub mod engine;
pub mod keeper;
mod rebalance;
mod registry;
pub mod types;
pub use types::*;
mod vault;

#[cfg(test)]
pub mod mock;

#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod weights;
pub use weights::WeightInfo;

/// Log target for everything the pallet reports.
pub const LOG_TARGET: &str = "runtime::fleet-commander";

/// Helper for benchmarking
#[cfg(feature = "runtime-benchmarks")]
pub trait BenchmarkHelper<AccountId> {
  /// Give `who` `amount` of the vault's underlying asset.
  fn fund_account(who: &AccountId, amount: u128) -> frame::deps::sp_runtime::DispatchResult;
  /// A fresh account usable as a standard ark.
  fn ark(index: u32) -> AccountId;
}

#[frame::pallet]
pub mod pallet {
  use super::{ArkAdapter, ArkRateOracle, LOG_TARGET, WeightInfo};
  use crate::types::*;
  use alloc::vec::Vec;
  use frame::deps::{
    frame_support::traits::{
      UnixTime,
      fungible::{Inspect, Mutate},
    },
    sp_runtime::{DispatchError, Permill},
  };
  use frame::prelude::*;
  use primitives::params::{DEFAULT_MAX_REBALANCE_OPERATIONS, DEFAULT_MAX_WITHDRAWAL_OPERATIONS};

  /// Configuration trait for the fleet commander pallet
  #[pallet::config]
  pub trait Config: frame_system::Config<RuntimeEvent: From<Event<Self>>> {
    /// The vault's underlying asset
    type Currency: Inspect<Self::AccountId, Balance = Balance> + Mutate<Self::AccountId>;

    /// Allocation targets, the buffer included
    type Arks: ArkAdapter<Self::AccountId, Balance>;

    /// Yield rates for the rebalance rate guard and keeper planning
    type RateOracle: ArkRateOracle<Self::AccountId>;

    /// Wall clock for the rebalance cooldown
    type UnixTime: UnixTime;

    /// The pallet ID, used to derive the custody account for in-flight assets
    #[pallet::constant]
    type PalletId: Get<PalletId>;

    /// The buffer ark: receives deposits and funds withdrawals first
    #[pallet::constant]
    type BufferArk: Get<Self::AccountId>;

    /// Maximum number of active arks (buffer excluded)
    #[pallet::constant]
    type MaxArks: Get<u32>;

    /// Ceiling for the curator-set batch length
    #[pallet::constant]
    type MaxRebalanceOperationsLimit: Get<u32>;

    /// Let `rebalance` carry buffer moves, validated with the buffer rules
    #[pallet::constant]
    type IntegratedBufferRebalance: Get<bool>;

    /// Whether `force_rebalance` restarts the cooldown
    #[pallet::constant]
    type ForceRebalanceAdvancesCooldown: Get<bool>;

    /// Origin that submits keeper batches; yields the keeper account
    type KeeperOrigin: EnsureOrigin<Self::RuntimeOrigin, Success = Self::AccountId>;

    /// Origin for registry membership, timing policy and forced batches
    type GovernorOrigin: EnsureOrigin<Self::RuntimeOrigin, Success = Self::AccountId>;

    /// Origin for caps, flow limits and buffer policy
    type CuratorOrigin: EnsureOrigin<Self::RuntimeOrigin>;

    /// Weight information for extrinsics
    type WeightInfo: WeightInfo;

    /// Helper for benchmarking
    #[cfg(feature = "runtime-benchmarks")]
    type BenchmarkHelper: crate::BenchmarkHelper<Self::AccountId>;
  }

  #[pallet::pallet]
  pub struct Pallet<T>(PhantomData<T>);

  /// Configuration of every active ark. The buffer never appears here.
  #[pallet::storage]
  pub type ArkConfigs<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, ArkConfig>;

  /// Active arks in registration order; withdrawals drain them in this order.
  #[pallet::storage]
  pub type ActiveArks<T: Config> =
    StorageValue<_, BoundedVec<T::AccountId, T::MaxArks>, ValueQuery>;

  /// Floor the buffer may not be drained below by buffer adjustments
  #[pallet::storage]
  #[pallet::getter(fn minimum_buffer_balance)]
  pub type MinimumBufferBalance<T: Config> = StorageValue<_, Balance, ValueQuery>;

  /// Unix seconds of the last cooldown-advancing batch
  #[pallet::storage]
  #[pallet::getter(fn last_rebalance_timestamp)]
  pub type LastRebalanceTimestamp<T: Config> = StorageValue<_, u64, ValueQuery>;

  /// Minimum seconds between cooldown-checked batches
  #[pallet::storage]
  #[pallet::getter(fn rebalance_cooldown)]
  pub type RebalanceCooldown<T: Config> = StorageValue<_, u64, ValueQuery>;

  /// Required rate improvement for moves between standard arks; unset disables the guard
  #[pallet::storage]
  #[pallet::getter(fn minimum_rate_difference)]
  pub type MinimumRateDifference<T: Config> = StorageValue<_, Permill>;

  /// Maximum instructions per batch
  #[pallet::storage]
  #[pallet::getter(fn max_rebalance_operations)]
  pub type MaxRebalanceOperations<T: Config> =
    StorageValue<_, u32, ValueQuery, ConstU32<DEFAULT_MAX_REBALANCE_OPERATIONS>>;

  /// Ceiling on the vault's total assets for deposits and mints
  #[pallet::storage]
  #[pallet::getter(fn deposit_cap)]
  pub type DepositCap<T: Config> = StorageValue<_, Balance, ValueQuery>;

  /// Maximum sources a forced withdrawal may drain
  #[pallet::storage]
  #[pallet::getter(fn max_withdrawal_operations)]
  pub type MaxWithdrawalOperations<T: Config> =
    StorageValue<_, u32, ValueQuery, ConstU32<DEFAULT_MAX_WITHDRAWAL_OPERATIONS>>;

  /// Total vault shares in existence
  #[pallet::storage]
  #[pallet::getter(fn total_shares)]
  pub type TotalShares<T: Config> = StorageValue<_, Balance, ValueQuery>;

  /// Vault shares per holder
  #[pallet::storage]
  #[pallet::getter(fn share_balance)]
  pub type ShareBalances<T: Config> =
    StorageMap<_, Blake2_128Concat, T::AccountId, Balance, ValueQuery>;

  /// Shares a spender may withdraw or redeem on an owner's behalf
  #[pallet::storage]
  #[pallet::getter(fn share_allowance)]
  pub type ShareAllowances<T: Config> = StorageDoubleMap<
    _,
    Blake2_128Concat,
    T::AccountId,
    Blake2_128Concat,
    T::AccountId,
    Balance,
    ValueQuery,
  >;

  #[pallet::genesis_config]
  #[derive(frame::prelude::DefaultNoBound)]
  pub struct GenesisConfig<T: Config> {
    /// Arks registered at genesis, in registry order
    pub arks: Vec<(T::AccountId, ArkConfig)>,
    pub minimum_buffer_balance: Balance,
    pub rebalance_cooldown: u64,
    pub minimum_rate_difference: Option<Permill>,
    pub deposit_cap: Balance,
  }

  #[pallet::genesis_build]
  impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
    fn build(&self) {
      // Custody only holds assets between two legs of a move; keep it alive.
      frame_system::Pallet::<T>::inc_providers(&Pallet::<T>::account_id());
      let buffer = T::BufferArk::get();
      for (ark, config) in &self.arks {
        assert!(*ark != buffer, "the buffer ark cannot be registered");
        assert!(
          !ArkConfigs::<T>::contains_key(ark),
          "duplicate ark in genesis"
        );
        let pushed = ActiveArks::<T>::mutate(|arks| arks.try_push(ark.clone()).is_ok());
        assert!(pushed, "genesis arks exceed MaxArks");
        ArkConfigs::<T>::insert(ark, config);
      }
      MinimumBufferBalance::<T>::put(self.minimum_buffer_balance);
      RebalanceCooldown::<T>::put(self.rebalance_cooldown);
      if let Some(difference) = self.minimum_rate_difference {
        MinimumRateDifference::<T>::put(difference);
      }
      DepositCap::<T>::put(self.deposit_cap);
    }
  }

  /// Events for the fleet commander pallet
  #[pallet::event]
  #[pallet::generate_deposit(pub(super) fn deposit_event)]
  pub enum Event<T: Config> {
    /// Assets moved between two arks
    Reallocated {
      from_ark: T::AccountId,
      to_ark: T::AccountId,
      amount: Balance,
    },
    /// A rebalance batch completed
    Rebalanced {
      keeper: T::AccountId,
      instructions: Vec<RebalanceDataOf<T>>,
      forced: bool,
    },
    /// A buffer adjustment batch completed
    BufferAdjusted {
      keeper: T::AccountId,
      total_moved: Balance,
    },
    /// Ark registered with default configuration
    ArkAdded { ark: T::AccountId },
    /// Ark removed from the registry
    ArkRemoved { ark: T::AccountId },
    /// Absolute deposit cap of an ark changed
    ArkDepositCapUpdated { ark: T::AccountId, cap: Balance },
    /// Share-of-TVL cap of an ark changed
    ArkMaxDepositPercentageOfTvlUpdated {
      ark: T::AccountId,
      percentage: Option<Permill>,
    },
    /// Per-batch inflow limit of an ark changed
    ArkMaxRebalanceInflowUpdated { ark: T::AccountId, limit: Balance },
    /// Per-batch outflow limit of an ark changed
    ArkMaxRebalanceOutflowUpdated { ark: T::AccountId, limit: Balance },
    /// Buffer floor changed
    MinimumBufferBalanceUpdated {
      old_balance: Balance,
      new_balance: Balance,
    },
    /// Cooldown changed
    RebalanceCooldownUpdated { old_cooldown: u64, new_cooldown: u64 },
    /// Batch length limit changed
    MaxRebalanceOperationsUpdated { old_limit: u32, new_limit: u32 },
    /// Rate guard threshold changed
    MinimumRateDifferenceUpdated {
      old_difference: Option<Permill>,
      new_difference: Option<Permill>,
    },
    /// Vault deposit cap changed
    DepositCapUpdated { old_cap: Balance, new_cap: Balance },
    /// Forced withdrawal source limit changed
    MaxWithdrawalOperationsUpdated { old_limit: u32, new_limit: u32 },
    /// Assets deposited for shares
    Deposit {
      sender: T::AccountId,
      owner: T::AccountId,
      assets: Balance,
      shares: Balance,
    },
    /// Shares burned for assets
    Withdraw {
      sender: T::AccountId,
      receiver: T::AccountId,
      owner: T::AccountId,
      assets: Balance,
      shares: Balance,
    },
    /// Share allowance set
    Approval {
      owner: T::AccountId,
      spender: T::AccountId,
      shares: Balance,
    },
  }

  /// Errors for the fleet commander pallet
  #[pallet::error]
  pub enum Error<T> {
    /// Origin lacks the required role
    Unauthorized,
    /// Cooldown since the last batch has not elapsed
    CooldownNotElapsed,
    /// Empty batch
    NoOperations,
    /// Batch longer than the configured maximum
    TooManyOperations,
    /// Operation limit outside its allowed range
    InvalidOperationLimit,
    /// Not an active ark or the buffer
    ArkNotFound,
    /// The null account cannot be an ark
    InvalidArkAddress,
    /// Ark already registered, or is the buffer
    DuplicateArk,
    /// Registry is full
    TooManyArks,
    /// The buffer cannot be removed
    CannotRemoveBuffer,
    /// Ark still accepts deposits
    ArkCapNotZero,
    /// Ark still holds assets
    ArkBalanceNotZero,
    /// Buffer moves go through `adjust_buffer`
    CannotRebalanceBufferHere,
    /// Source and target are the same ark
    CannotRebalanceToSameArk,
    /// Target ark's effective deposit cap is zero
    ArkCapZero,
    /// The max sentinel cannot drain the buffer
    CannotUseMaxFromBuffer,
    /// Resolved move amount is zero
    AmountZero,
    /// Cumulative outflow of an ark exceeds its per-batch limit
    ExceedsMaxOutflow,
    /// Cumulative inflow of an ark exceeds its per-batch limit
    ExceedsMaxInflow,
    /// Move would push the target past its effective deposit cap
    EffectiveDepositCapExceeded,
    /// Target does not pay enough more than the source
    TargetRateTooLow,
    /// Buffer adjustments need the buffer on exactly one side
    InvalidBufferAdjustment,
    /// Buffer holds nothing above its floor
    NoExcessFunds,
    /// Move exceeds the buffer's excess over its floor
    InsufficientBuffer,
    /// Caller is neither the owner nor sufficiently approved
    UnauthorizedWithdrawal,
    /// Withdrawal exceeds what the owner can currently withdraw
    ExceededMaxWithdraw,
    /// Redemption exceeds the owner's shares
    ExceededMaxRedeem,
    /// Deposit exceeds the room under the vault cap
    ExceededMaxDeposit,
    /// Zero assets requested or resulting
    ZeroAssets,
    /// Zero shares requested or resulting
    ZeroShares,
    /// Owner holds fewer shares than required
    InsufficientShares,
    /// Arithmetic overflow occurred
    ArithmeticOverflow,
    /// An ark or the currency refused a move
    ArkCallFailed,
  }

  impl<T: Config> From<FleetError<T::AccountId>> for Error<T> {
    fn from(error: FleetError<T::AccountId>) -> Self {
      match error {
        FleetError::Unauthorized => Error::Unauthorized,
        FleetError::CooldownNotElapsed { .. } => Error::CooldownNotElapsed,
        FleetError::NoOperations => Error::NoOperations,
        FleetError::TooManyOperations { .. } => Error::TooManyOperations,
        FleetError::InvalidOperationLimit { .. } => Error::InvalidOperationLimit,
        FleetError::ArkNotFound { .. } => Error::ArkNotFound,
        FleetError::InvalidArkAddress => Error::InvalidArkAddress,
        FleetError::DuplicateArk { .. } => Error::DuplicateArk,
        FleetError::TooManyArks => Error::TooManyArks,
        FleetError::CannotRemoveBuffer => Error::CannotRemoveBuffer,
        FleetError::ArkCapNotZero { .. } => Error::ArkCapNotZero,
        FleetError::ArkBalanceNotZero { .. } => Error::ArkBalanceNotZero,
        FleetError::CannotRebalanceBufferHere => Error::CannotRebalanceBufferHere,
        FleetError::CannotRebalanceToSameArk { .. } => Error::CannotRebalanceToSameArk,
        FleetError::ArkCapZero { .. } => Error::ArkCapZero,
        FleetError::CannotUseMaxFromBuffer => Error::CannotUseMaxFromBuffer,
        FleetError::AmountZero { .. } => Error::AmountZero,
        FleetError::ExceedsMaxOutflow { .. } => Error::ExceedsMaxOutflow,
        FleetError::ExceedsMaxInflow { .. } => Error::ExceedsMaxInflow,
        FleetError::EffectiveDepositCapExceeded { .. } => Error::EffectiveDepositCapExceeded,
        FleetError::TargetRateTooLow { .. } => Error::TargetRateTooLow,
        FleetError::InvalidBufferAdjustment => Error::InvalidBufferAdjustment,
        FleetError::NoExcessFunds => Error::NoExcessFunds,
        FleetError::InsufficientBuffer { .. } => Error::InsufficientBuffer,
        FleetError::UnauthorizedWithdrawal { .. } => Error::UnauthorizedWithdrawal,
        FleetError::ExceededMaxWithdraw { .. } => Error::ExceededMaxWithdraw,
        FleetError::ExceededMaxRedeem { .. } => Error::ExceededMaxRedeem,
        FleetError::ExceededMaxDeposit { .. } => Error::ExceededMaxDeposit,
        FleetError::ZeroAssets => Error::ZeroAssets,
        FleetError::ZeroShares => Error::ZeroShares,
        FleetError::InsufficientShares { .. } => Error::InsufficientShares,
        FleetError::Overflow => Error::ArithmeticOverflow,
        FleetError::Ark(_) => Error::ArkCallFailed,
      }
    }
  }

  #[pallet::call]
  impl<T: Config> Pallet<T> {
    /// Execute a keeper batch of moves between standard arks
    #[pallet::call_index(0)]
    #[pallet::weight(T::WeightInfo::rebalance(instructions.len() as u32))]
    pub fn rebalance(
      origin: OriginFor<T>,
      instructions: Vec<RebalanceDataOf<T>>,
    ) -> DispatchResult {
      let keeper = T::KeeperOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      Self::do_rebalance(keeper, instructions, BatchKind::Rebalance).map_err(Self::reject)?;
      Ok(())
    }

    /// Execute a rebalance batch without waiting for the cooldown (governor only)
    #[pallet::call_index(1)]
    #[pallet::weight(T::WeightInfo::force_rebalance(instructions.len() as u32))]
    pub fn force_rebalance(
      origin: OriginFor<T>,
      instructions: Vec<RebalanceDataOf<T>>,
    ) -> DispatchResult {
      let governor =
        T::GovernorOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      Self::do_rebalance(governor, instructions, BatchKind::ForceRebalance)
        .map_err(Self::reject)?;
      Ok(())
    }

    /// Move funds between the buffer and standard arks
    #[pallet::call_index(2)]
    #[pallet::weight(T::WeightInfo::adjust_buffer(instructions.len() as u32))]
    pub fn adjust_buffer(
      origin: OriginFor<T>,
      instructions: Vec<RebalanceDataOf<T>>,
    ) -> DispatchResult {
      let keeper = T::KeeperOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      Self::do_rebalance(keeper, instructions, BatchKind::AdjustBuffer).map_err(Self::reject)?;
      Ok(())
    }

    /// Register an ark (governor only)
    #[pallet::call_index(3)]
    #[pallet::weight(T::WeightInfo::add_ark())]
    pub fn add_ark(origin: OriginFor<T>, ark: T::AccountId) -> DispatchResult {
      T::GovernorOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      Self::do_add_ark(ark).map_err(Self::reject)
    }

    /// Remove an emptied, closed ark (governor only)
    #[pallet::call_index(4)]
    #[pallet::weight(T::WeightInfo::remove_ark())]
    pub fn remove_ark(origin: OriginFor<T>, ark: T::AccountId) -> DispatchResult {
      T::GovernorOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      Self::do_remove_ark(ark).map_err(Self::reject)
    }

    /// Set an ark's absolute deposit cap (curator only)
    #[pallet::call_index(5)]
    #[pallet::weight(T::WeightInfo::set_ark_deposit_cap())]
    pub fn set_ark_deposit_cap(
      origin: OriginFor<T>,
      ark: T::AccountId,
      cap: Balance,
    ) -> DispatchResult {
      T::CuratorOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      Self::update_ark_config(&ark, |config| config.deposit_cap = cap).map_err(Self::reject)?;
      Self::deposit_event(Event::ArkDepositCapUpdated { ark, cap });
      Ok(())
    }

    /// Set or clear an ark's share-of-TVL cap (curator only)
    #[pallet::call_index(6)]
    #[pallet::weight(T::WeightInfo::set_ark_max_deposit_percentage_of_tvl())]
    pub fn set_ark_max_deposit_percentage_of_tvl(
      origin: OriginFor<T>,
      ark: T::AccountId,
      percentage: Option<Permill>,
    ) -> DispatchResult {
      T::CuratorOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      Self::update_ark_config(&ark, |config| {
        config.max_deposit_percentage_of_tvl = percentage
      })
      .map_err(Self::reject)?;
      Self::deposit_event(Event::ArkMaxDepositPercentageOfTvlUpdated { ark, percentage });
      Ok(())
    }

    /// Set an ark's per-batch inflow limit (curator only)
    #[pallet::call_index(7)]
    #[pallet::weight(T::WeightInfo::set_ark_max_rebalance_inflow())]
    pub fn set_ark_max_rebalance_inflow(
      origin: OriginFor<T>,
      ark: T::AccountId,
      limit: Balance,
    ) -> DispatchResult {
      T::CuratorOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      Self::update_ark_config(&ark, |config| config.max_rebalance_inflow = limit)
        .map_err(Self::reject)?;
      Self::deposit_event(Event::ArkMaxRebalanceInflowUpdated { ark, limit });
      Ok(())
    }

    /// Set an ark's per-batch outflow limit (curator only)
    #[pallet::call_index(8)]
    #[pallet::weight(T::WeightInfo::set_ark_max_rebalance_outflow())]
    pub fn set_ark_max_rebalance_outflow(
      origin: OriginFor<T>,
      ark: T::AccountId,
      limit: Balance,
    ) -> DispatchResult {
      T::CuratorOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      Self::update_ark_config(&ark, |config| config.max_rebalance_outflow = limit)
        .map_err(Self::reject)?;
      Self::deposit_event(Event::ArkMaxRebalanceOutflowUpdated { ark, limit });
      Ok(())
    }

    /// Update the buffer floor (curator only)
    #[pallet::call_index(9)]
    #[pallet::weight(T::WeightInfo::set_minimum_buffer_balance())]
    pub fn set_minimum_buffer_balance(
      origin: OriginFor<T>,
      new_balance: Balance,
    ) -> DispatchResult {
      T::CuratorOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      let old_balance = MinimumBufferBalance::<T>::get();
      MinimumBufferBalance::<T>::put(new_balance);
      Self::deposit_event(Event::MinimumBufferBalanceUpdated {
        old_balance,
        new_balance,
      });
      Ok(())
    }

    /// Update the cooldown between keeper batches (governor only)
    ///
    /// Applies to the time already elapsed since the last batch.
    #[pallet::call_index(10)]
    #[pallet::weight(T::WeightInfo::update_rebalance_cooldown())]
    pub fn update_rebalance_cooldown(origin: OriginFor<T>, new_cooldown: u64) -> DispatchResult {
      T::GovernorOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      let old_cooldown = RebalanceCooldown::<T>::get();
      RebalanceCooldown::<T>::put(new_cooldown);
      Self::deposit_event(Event::RebalanceCooldownUpdated {
        old_cooldown,
        new_cooldown,
      });
      Ok(())
    }

    /// Update the batch length limit (curator only)
    #[pallet::call_index(11)]
    #[pallet::weight(T::WeightInfo::set_max_rebalance_operations())]
    pub fn set_max_rebalance_operations(origin: OriginFor<T>, new_limit: u32) -> DispatchResult {
      T::CuratorOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      Self::ensure_operation_limit(new_limit, T::MaxRebalanceOperationsLimit::get())
        .map_err(Self::reject)?;
      let old_limit = MaxRebalanceOperations::<T>::get();
      MaxRebalanceOperations::<T>::put(new_limit);
      Self::deposit_event(Event::MaxRebalanceOperationsUpdated {
        old_limit,
        new_limit,
      });
      Ok(())
    }

    /// Set or clear the rate guard threshold (governor only)
    #[pallet::call_index(12)]
    #[pallet::weight(T::WeightInfo::set_minimum_rate_difference())]
    pub fn set_minimum_rate_difference(
      origin: OriginFor<T>,
      new_difference: Option<Permill>,
    ) -> DispatchResult {
      T::GovernorOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      let old_difference = MinimumRateDifference::<T>::get();
      MinimumRateDifference::<T>::set(new_difference);
      Self::deposit_event(Event::MinimumRateDifferenceUpdated {
        old_difference,
        new_difference,
      });
      Ok(())
    }

    /// Update the vault deposit cap (curator only)
    #[pallet::call_index(13)]
    #[pallet::weight(T::WeightInfo::set_deposit_cap())]
    pub fn set_deposit_cap(origin: OriginFor<T>, new_cap: Balance) -> DispatchResult {
      T::CuratorOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      let old_cap = DepositCap::<T>::get();
      DepositCap::<T>::put(new_cap);
      Self::deposit_event(Event::DepositCapUpdated { old_cap, new_cap });
      Ok(())
    }

    /// Update how many sources a forced withdrawal may drain (curator only)
    #[pallet::call_index(14)]
    #[pallet::weight(T::WeightInfo::set_max_withdrawal_operations())]
    pub fn set_max_withdrawal_operations(origin: OriginFor<T>, new_limit: u32) -> DispatchResult {
      T::CuratorOrigin::ensure_origin(origin).map_err(|_| Error::<T>::Unauthorized)?;
      // buffer plus every active ark
      Self::ensure_operation_limit(new_limit, T::MaxArks::get().saturating_add(1))
        .map_err(Self::reject)?;
      let old_limit = MaxWithdrawalOperations::<T>::get();
      MaxWithdrawalOperations::<T>::put(new_limit);
      Self::deposit_event(Event::MaxWithdrawalOperationsUpdated {
        old_limit,
        new_limit,
      });
      Ok(())
    }

    /// Deposit assets into the buffer and mint shares to `receiver`
    #[pallet::call_index(15)]
    #[pallet::weight(T::WeightInfo::deposit())]
    pub fn deposit(origin: OriginFor<T>, assets: Balance, receiver: T::AccountId) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_deposit(who, assets, receiver).map_err(Self::reject)?;
      Ok(())
    }

    /// Mint exactly `shares` to `receiver`, pulling the required assets
    #[pallet::call_index(16)]
    #[pallet::weight(T::WeightInfo::mint())]
    pub fn mint(origin: OriginFor<T>, shares: Balance, receiver: T::AccountId) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_mint(who, shares, receiver).map_err(Self::reject)?;
      Ok(())
    }

    /// Withdraw assets, escalating to the arks when the buffer falls short
    #[pallet::call_index(17)]
    #[pallet::weight(T::WeightInfo::withdraw_from_arks(T::MaxArks::get()))]
    pub fn withdraw(
      origin: OriginFor<T>,
      assets: Balance,
      receiver: T::AccountId,
      owner: T::AccountId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_withdraw(who, assets, receiver, owner, WithdrawalRoute::Auto)
        .map_err(Self::reject)?;
      Ok(())
    }

    /// Withdraw assets from the buffer only
    #[pallet::call_index(18)]
    #[pallet::weight(T::WeightInfo::withdraw_from_buffer())]
    pub fn withdraw_from_buffer(
      origin: OriginFor<T>,
      assets: Balance,
      receiver: T::AccountId,
      owner: T::AccountId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_withdraw(who, assets, receiver, owner, WithdrawalRoute::Buffer)
        .map_err(Self::reject)?;
      Ok(())
    }

    /// Withdraw assets from the buffer and then the arks in registry order
    #[pallet::call_index(19)]
    #[pallet::weight(T::WeightInfo::withdraw_from_arks(T::MaxArks::get()))]
    pub fn withdraw_from_arks(
      origin: OriginFor<T>,
      assets: Balance,
      receiver: T::AccountId,
      owner: T::AccountId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_withdraw(who, assets, receiver, owner, WithdrawalRoute::Arks)
        .map_err(Self::reject)?;
      Ok(())
    }

    /// Burn `shares` for assets, escalating to the arks when needed
    #[pallet::call_index(20)]
    #[pallet::weight(T::WeightInfo::withdraw_from_arks(T::MaxArks::get()))]
    pub fn redeem(
      origin: OriginFor<T>,
      shares: Balance,
      receiver: T::AccountId,
      owner: T::AccountId,
    ) -> DispatchResult {
      let who = ensure_signed(origin)?;
      Self::do_redeem(who, shares, receiver, owner).map_err(Self::reject)?;
      Ok(())
    }

    /// Allow `spender` to withdraw up to `shares` on the caller's behalf
    #[pallet::call_index(21)]
    #[pallet::weight(T::WeightInfo::approve())]
    pub fn approve(origin: OriginFor<T>, spender: T::AccountId, shares: Balance) -> DispatchResult {
      let owner = ensure_signed(origin)?;
      ShareAllowances::<T>::insert(&owner, &spender, shares);
      Self::deposit_event(Event::Approval {
        owner,
        spender,
        shares,
      });
      Ok(())
    }
  }

  impl<T: Config> Pallet<T> {
    /// Log a detailed engine failure and turn it into a dispatch error.
    ///
    /// Adapter and currency errors pass through unchanged.
    pub(crate) fn reject(error: FleetError<T::AccountId>) -> DispatchError {
      log::debug!(target: LOG_TARGET, "fleet call rejected: {:?}", error);
      match error {
        FleetError::Ark(inner) => inner,
        other => Error::<T>::from(other).into(),
      }
    }

    /// Current unix time in seconds.
    pub(crate) fn now() -> u64 {
      T::UnixTime::now().as_secs()
    }

    fn ensure_operation_limit(requested: u32, limit: u32) -> Result<(), FleetError<T::AccountId>> {
      ensure!(
        requested > 0 && requested <= limit,
        FleetError::InvalidOperationLimit { requested, limit }
      );
      Ok(())
    }
  }
}
