extern crate alloc;

use crate as pallet_fleet_commander;
use crate::{ArkAdapter, ArkConfig, ArkRateOracle};
use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::time::Duration;
use polkadot_sdk::frame_support::traits::{
  Currency, SortedMembers, UnixTime,
  fungible::Mutate,
  tokens::Preservation,
};
use polkadot_sdk::frame_support::{
  PalletId, construct_runtime, derive_impl,
  traits::{ConstU32, ConstU128, Get},
};
use polkadot_sdk::frame_system::{self, EnsureSignedBy};
use polkadot_sdk::sp_runtime::{
  BuildStorage, DispatchError, DispatchResult,
  testing::H256,
  traits::{BlakeTwo256, IdentityLookup},
};
use primitives::params::{DEFAULT_REBALANCE_COOLDOWN_SECS, MAX_REBALANCE_OPERATIONS_LIMIT};
use std::cell::RefCell;

pub type AccountId = u64;
pub type Balance = u128;

pub const ALICE: AccountId = 1;
pub const BOB: AccountId = 2;
pub const CHARLIE: AccountId = 3;
pub const KEEPER: AccountId = 10;
pub const GOVERNOR: AccountId = 11;
pub const CURATOR: AccountId = 12;
pub const BUFFER: AccountId = 100;
pub const ARK_1: AccountId = 101;
pub const ARK_2: AccountId = 102;
pub const ARK_3: AccountId = 103;
pub const UNKNOWN_ARK: AccountId = 199;

pub const TEST_INITIAL_BALANCE: Balance = 1_000_000;
pub const GENESIS_ARK_CAP: Balance = 1_000_000;
pub const GENESIS_DEPOSIT_CAP: Balance = 10_000_000;
pub const GENESIS_NOW: u64 = 1_700_000_000;

type Block = frame_system::mocking::MockBlock<Test>;

construct_runtime!(
  pub struct Test {
    System: frame_system,
    Balances: polkadot_sdk::pallet_balances,
    FleetCommander: pallet_fleet_commander,
  }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
  type Block = Block;
  type AccountId = AccountId;
  type Lookup = IdentityLookup<Self::AccountId>;
  type Hash = H256;
  type Hashing = BlakeTwo256;
  type AccountData = polkadot_sdk::pallet_balances::AccountData<Balance>;
}

impl polkadot_sdk::pallet_balances::Config for Test {
  type MaxLocks = ();
  type MaxReserves = ();
  type ReserveIdentifier = [u8; 8];
  type Balance = Balance;
  type DustRemoval = ();
  type RuntimeEvent = RuntimeEvent;
  type ExistentialDeposit = ConstU128<1>;
  type AccountStore = System;
  type WeightInfo = ();
  type FreezeIdentifier = ();
  type MaxFreezes = ();
  type RuntimeHoldReason = ();
  type RuntimeFreezeReason = ();
  type DoneSlashHandler = ();
}

// State containers for stateful mocks
thread_local! {
  // Wall clock in unix seconds
  static NOW: RefCell<u64> = const { RefCell::new(GENESIS_NOW) };

  // Ark -> reported yield rate
  static RATES: RefCell<BTreeMap<AccountId, u128>> = const { RefCell::new(BTreeMap::new()) };

  // Arks that report nothing withdrawable and refuse to disembark
  static LOCKED_ARKS: RefCell<BTreeSet<AccountId>> = const { RefCell::new(BTreeSet::new()) };

  // Arks that refuse to board
  static REJECTING_ARKS: RefCell<BTreeSet<AccountId>> = const { RefCell::new(BTreeSet::new()) };

  // Last payload each ark received: (board, disembark)
  static PAYLOADS: RefCell<BTreeMap<AccountId, (Vec<u8>, Vec<u8>)>> = const { RefCell::new(BTreeMap::new()) };

  static INTEGRATED_BUFFER: RefCell<bool> = const { RefCell::new(false) };
  static FORCE_ADVANCES_COOLDOWN: RefCell<bool> = const { RefCell::new(true) };
}

pub fn reset_mock_state() {
  NOW.with(|n| *n.borrow_mut() = GENESIS_NOW);
  RATES.with(|r| r.borrow_mut().clear());
  LOCKED_ARKS.with(|l| l.borrow_mut().clear());
  REJECTING_ARKS.with(|r| r.borrow_mut().clear());
  PAYLOADS.with(|p| p.borrow_mut().clear());
  INTEGRATED_BUFFER.with(|i| *i.borrow_mut() = false);
  FORCE_ADVANCES_COOLDOWN.with(|f| *f.borrow_mut() = true);
}

pub fn now() -> u64 {
  NOW.with(|n| *n.borrow())
}

pub fn set_now(secs: u64) {
  NOW.with(|n| *n.borrow_mut() = secs);
}

pub fn advance_time(secs: u64) {
  NOW.with(|n| *n.borrow_mut() += secs);
}

pub fn set_rate(ark: AccountId, rate: u128) {
  RATES.with(|r| r.borrow_mut().insert(ark, rate));
}

pub fn lock_ark(ark: AccountId) {
  LOCKED_ARKS.with(|l| l.borrow_mut().insert(ark));
}

pub fn reject_boarding(ark: AccountId) {
  REJECTING_ARKS.with(|r| r.borrow_mut().insert(ark));
}

pub fn last_payloads(ark: AccountId) -> Option<(Vec<u8>, Vec<u8>)> {
  PAYLOADS.with(|p| p.borrow().get(&ark).cloned())
}

pub fn set_integrated_buffer(enabled: bool) {
  INTEGRATED_BUFFER.with(|i| *i.borrow_mut() = enabled);
}

pub fn set_force_advances_cooldown(enabled: bool) {
  FORCE_ADVANCES_COOLDOWN.with(|f| *f.borrow_mut() = enabled);
}

/// Simulate yield: the ark's holdings grow without any deposit.
pub fn accrue(ark: AccountId, amount: Balance) {
  let _ = <Balances as Currency<AccountId>>::deposit_creating(&ark, amount);
}

pub fn ark_balance(ark: AccountId) -> Balance {
  Balances::free_balance(ark)
}

/// Arks backed by plain balances accounts, so every move is storage and
/// rolls back with the extrinsic.
pub struct MockArks;
impl ArkAdapter<AccountId, Balance> for MockArks {
  fn total_assets(ark: &AccountId) -> Balance {
    Balances::free_balance(ark)
  }

  fn withdrawable_assets(ark: &AccountId) -> Balance {
    if LOCKED_ARKS.with(|l| l.borrow().contains(ark)) {
      0
    } else {
      Balances::free_balance(ark)
    }
  }

  fn board(ark: &AccountId, from: &AccountId, amount: Balance, data: &[u8]) -> DispatchResult {
    if REJECTING_ARKS.with(|r| r.borrow().contains(ark)) {
      return Err(DispatchError::Other("ark rejected deposit"));
    }
    PAYLOADS.with(|p| p.borrow_mut().entry(*ark).or_default().0 = data.to_vec());
    <Balances as Mutate<AccountId>>::transfer(from, ark, amount, Preservation::Expendable)?;
    Ok(())
  }

  fn disembark(ark: &AccountId, to: &AccountId, amount: Balance, data: &[u8]) -> DispatchResult {
    if LOCKED_ARKS.with(|l| l.borrow().contains(ark)) {
      return Err(DispatchError::Other("ark is locked"));
    }
    PAYLOADS.with(|p| p.borrow_mut().entry(*ark).or_default().1 = data.to_vec());
    <Balances as Mutate<AccountId>>::transfer(ark, to, amount, Preservation::Expendable)?;
    Ok(())
  }
}

pub struct MockRates;
impl ArkRateOracle<AccountId> for MockRates {
  fn rate(ark: &AccountId) -> Option<u128> {
    RATES.with(|r| r.borrow().get(ark).copied())
  }
}

pub struct MockTime;
impl UnixTime for MockTime {
  fn now() -> Duration {
    Duration::from_secs(now())
  }
}

pub struct FleetPalletId;
impl Get<PalletId> for FleetPalletId {
  fn get() -> PalletId {
    PalletId(*primitives::pallet_ids::FLEET_COMMANDER_PALLET_ID)
  }
}

pub struct BufferArk;
impl Get<AccountId> for BufferArk {
  fn get() -> AccountId {
    BUFFER
  }
}

pub struct IntegratedBufferRebalance;
impl Get<bool> for IntegratedBufferRebalance {
  fn get() -> bool {
    INTEGRATED_BUFFER.with(|i| *i.borrow())
  }
}

pub struct ForceRebalanceAdvancesCooldown;
impl Get<bool> for ForceRebalanceAdvancesCooldown {
  fn get() -> bool {
    FORCE_ADVANCES_COOLDOWN.with(|f| *f.borrow())
  }
}

pub struct Keeper;
impl SortedMembers<AccountId> for Keeper {
  fn sorted_members() -> Vec<AccountId> {
    alloc::vec![KEEPER]
  }
}

pub struct Governor;
impl SortedMembers<AccountId> for Governor {
  fn sorted_members() -> Vec<AccountId> {
    alloc::vec![GOVERNOR]
  }
}

pub struct Curator;
impl SortedMembers<AccountId> for Curator {
  fn sorted_members() -> Vec<AccountId> {
    alloc::vec![CURATOR]
  }
}

impl pallet_fleet_commander::Config for Test {
  type Currency = Balances;
  type Arks = MockArks;
  type RateOracle = MockRates;
  type UnixTime = MockTime;
  type PalletId = FleetPalletId;
  type BufferArk = BufferArk;
  type MaxArks = ConstU32<5>;
  type MaxRebalanceOperationsLimit = ConstU32<MAX_REBALANCE_OPERATIONS_LIMIT>;
  type IntegratedBufferRebalance = IntegratedBufferRebalance;
  type ForceRebalanceAdvancesCooldown = ForceRebalanceAdvancesCooldown;
  type KeeperOrigin = EnsureSignedBy<Keeper, AccountId>;
  type GovernorOrigin = EnsureSignedBy<Governor, AccountId>;
  type CuratorOrigin = EnsureSignedBy<Curator, AccountId>;
  type WeightInfo = ();
  #[cfg(feature = "runtime-benchmarks")]
  type BenchmarkHelper = FleetBenchmarkHelper;
}

#[cfg(feature = "runtime-benchmarks")]
pub struct FleetBenchmarkHelper;

#[cfg(feature = "runtime-benchmarks")]
impl crate::BenchmarkHelper<AccountId> for FleetBenchmarkHelper {
  fn fund_account(who: &AccountId, amount: u128) -> DispatchResult {
    let _ = <Balances as Currency<AccountId>>::deposit_creating(who, amount);
    Ok(())
  }

  fn ark(index: u32) -> AccountId {
    500 + u64::from(index)
  }
}

/// Configuration of the arks registered at genesis.
pub fn genesis_ark_config() -> ArkConfig {
  ArkConfig {
    deposit_cap: GENESIS_ARK_CAP,
    ..ArkConfig::unconfigured()
  }
}

pub fn new_test_ext() -> polkadot_sdk::sp_io::TestExternalities {
  let mut t = frame_system::GenesisConfig::<Test>::default()
    .build_storage()
    .unwrap();

  polkadot_sdk::pallet_balances::GenesisConfig::<Test> {
    balances: alloc::vec![
      (ALICE, TEST_INITIAL_BALANCE),
      (BOB, TEST_INITIAL_BALANCE),
      (CHARLIE, TEST_INITIAL_BALANCE),
    ],
    dev_accounts: None,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  pallet_fleet_commander::GenesisConfig::<Test> {
    arks: alloc::vec![
      (ARK_1, genesis_ark_config()),
      (ARK_2, genesis_ark_config()),
      (ARK_3, genesis_ark_config()),
    ],
    minimum_buffer_balance: 0,
    rebalance_cooldown: DEFAULT_REBALANCE_COOLDOWN_SECS,
    minimum_rate_difference: None,
    deposit_cap: GENESIS_DEPOSIT_CAP,
  }
  .assimilate_storage(&mut t)
  .unwrap();

  reset_mock_state();

  let mut ext = polkadot_sdk::sp_io::TestExternalities::new(t);
  ext.execute_with(|| System::set_block_number(1));
  ext
}
