//! Instruction and error types shared by the fleet engines.

use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use frame::deps::sp_runtime::DispatchError;
use frame::prelude::{BoundedVec, ConstU32, frame_system};
use primitives::params::{MAX_AMOUNT, MAX_ARK_DATA_LEN};
use scale_info::TypeInfo;

pub use primitives::{ArkConfig, ArkKind, Balance};

/// Opaque payload forwarded untouched to an ark's board or disembark hook.
pub type ArkData = BoundedVec<u8, ConstU32<MAX_ARK_DATA_LEN>>;

/// Instruction alias bound to the runtime's account type.
pub type RebalanceDataOf<T> = RebalanceData<<T as frame_system::Config>::AccountId>;

/// One move of assets between two arks.
#[derive(
  Clone, Debug, Decode, DecodeWithMemTracking, Encode, Eq, MaxEncodedLen, PartialEq, TypeInfo,
)]
pub struct RebalanceData<AccountId> {
  pub from_ark: AccountId,
  pub to_ark: AccountId,
  /// Amount to move; [`MAX_AMOUNT`] means everything `from_ark` holds.
  pub amount: Balance,
  pub board_data: ArkData,
  pub disembark_data: ArkData,
}

impl<AccountId> RebalanceData<AccountId> {
  /// Instruction without ark payloads.
  pub fn new(from_ark: AccountId, to_ark: AccountId, amount: Balance) -> Self {
    Self {
      from_ark,
      to_ark,
      amount,
      board_data: BoundedVec::default(),
      disembark_data: BoundedVec::default(),
    }
  }

  pub fn is_max(&self) -> bool {
    self.amount == MAX_AMOUNT
  }
}

/// Which validation path a batch goes through.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BatchKind {
  /// Keeper batch between standard arks, cooldown enforced.
  Rebalance,
  /// Governor batch, cooldown bypassed.
  ForceRebalance,
  /// Keeper batch moving funds between the buffer and standard arks.
  AdjustBuffer,
}

impl BatchKind {
  pub fn enforces_cooldown(self) -> bool {
    !matches!(self, BatchKind::ForceRebalance)
  }
}

/// Where a withdrawal is allowed to source assets from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WithdrawalRoute {
  /// Buffer only.
  Buffer,
  /// Buffer first, then active arks in registry order.
  Arks,
  /// Buffer when it covers the request, otherwise [`WithdrawalRoute::Arks`].
  Auto,
}

/// Detailed failure reported by the fleet engines.
///
/// Carries the values that caused the rejection. Dispatchables log it and
/// surface the matching unit variant of the pallet `Error`, since module
/// errors cannot hold balances.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FleetError<AccountId> {
  Unauthorized,
  CooldownNotElapsed {
    last: u64,
    cooldown: u64,
    now: u64,
  },
  NoOperations,
  TooManyOperations {
    count: u32,
    limit: u32,
  },
  InvalidOperationLimit {
    requested: u32,
    limit: u32,
  },
  ArkNotFound {
    ark: AccountId,
  },
  InvalidArkAddress,
  DuplicateArk {
    ark: AccountId,
  },
  TooManyArks,
  CannotRemoveBuffer,
  ArkCapNotZero {
    ark: AccountId,
    cap: Balance,
  },
  ArkBalanceNotZero {
    ark: AccountId,
    balance: Balance,
  },
  CannotRebalanceBufferHere,
  CannotRebalanceToSameArk {
    ark: AccountId,
  },
  ArkCapZero {
    ark: AccountId,
  },
  CannotUseMaxFromBuffer,
  AmountZero {
    ark: AccountId,
  },
  ExceedsMaxOutflow {
    ark: AccountId,
    cumulative: Balance,
    limit: Balance,
  },
  ExceedsMaxInflow {
    ark: AccountId,
    cumulative: Balance,
    limit: Balance,
  },
  EffectiveDepositCapExceeded {
    ark: AccountId,
    projected: Balance,
    cap: Balance,
  },
  TargetRateTooLow {
    ark: AccountId,
    to_rate: u128,
    from_rate: u128,
  },
  InvalidBufferAdjustment,
  NoExcessFunds,
  InsufficientBuffer {
    requested: Balance,
    available: Balance,
  },
  UnauthorizedWithdrawal {
    caller: AccountId,
    owner: AccountId,
  },
  ExceededMaxWithdraw {
    owner: AccountId,
    requested: Balance,
    max: Balance,
  },
  ExceededMaxRedeem {
    owner: AccountId,
    requested: Balance,
    max: Balance,
  },
  ExceededMaxDeposit {
    receiver: AccountId,
    requested: Balance,
    max: Balance,
  },
  ZeroAssets,
  ZeroShares,
  InsufficientShares {
    owner: AccountId,
    requested: Balance,
    balance: Balance,
  },
  Overflow,
  /// An ark adapter or the underlying currency refused the call.
  Ark(DispatchError),
}

impl<AccountId> From<DispatchError> for FleetError<AccountId> {
  fn from(error: DispatchError) -> Self {
    FleetError::Ark(error)
  }
}
