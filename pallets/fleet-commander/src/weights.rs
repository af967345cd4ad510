#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]
#![allow(missing_docs)]

use core::marker::PhantomData;
use polkadot_sdk::frame_support::{
  traits::Get,
  weights::{constants::RocksDbWeight, Weight},
};

pub trait WeightInfo {
  fn rebalance(n: u32) -> Weight;
  fn force_rebalance(n: u32) -> Weight;
  fn adjust_buffer(n: u32) -> Weight;
  fn add_ark() -> Weight;
  fn remove_ark() -> Weight;
  fn set_ark_deposit_cap() -> Weight;
  fn set_ark_max_deposit_percentage_of_tvl() -> Weight;
  fn set_ark_max_rebalance_inflow() -> Weight;
  fn set_ark_max_rebalance_outflow() -> Weight;
  fn set_minimum_buffer_balance() -> Weight;
  fn update_rebalance_cooldown() -> Weight;
  fn set_max_rebalance_operations() -> Weight;
  fn set_minimum_rate_difference() -> Weight;
  fn set_deposit_cap() -> Weight;
  fn set_max_withdrawal_operations() -> Weight;
  fn deposit() -> Weight;
  fn mint() -> Weight;
  fn withdraw_from_buffer() -> Weight;
  fn withdraw_from_arks(n: u32) -> Weight;
  fn approve() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: polkadot_sdk::frame_system::Config + crate::Config> WeightInfo for SubstrateWeight<T> {
  /// Every instruction re-reads the registry for total assets, so the
  /// per-instruction cost grows with `MaxArks`.
  fn rebalance(n: u32) -> Weight {
    let arks = u64::from(T::MaxArks::get());
    Weight::from_parts(30_000_000, 3000)
      .saturating_add(Weight::from_parts(45_000_000, 1500).saturating_mul(u64::from(n)))
      .saturating_add(T::DbWeight::get().reads(5))
      .saturating_add(T::DbWeight::get().reads(arks.saturating_add(6).saturating_mul(u64::from(n))))
      .saturating_add(T::DbWeight::get().writes(1))
      .saturating_add(T::DbWeight::get().writes(4u64.saturating_mul(u64::from(n))))
  }

  fn force_rebalance(n: u32) -> Weight {
    Self::rebalance(n)
  }

  fn adjust_buffer(n: u32) -> Weight {
    let arks = u64::from(T::MaxArks::get());
    Weight::from_parts(30_000_000, 3000)
      .saturating_add(Weight::from_parts(40_000_000, 1500).saturating_mul(u64::from(n)))
      .saturating_add(T::DbWeight::get().reads(5))
      .saturating_add(T::DbWeight::get().reads(arks.saturating_add(5).saturating_mul(u64::from(n))))
      .saturating_add(T::DbWeight::get().writes(1))
      .saturating_add(T::DbWeight::get().writes(4u64.saturating_mul(u64::from(n))))
  }

  fn add_ark() -> Weight {
    Weight::from_parts(18_000_000, 1800)
      .saturating_add(T::DbWeight::get().reads(2))
      .saturating_add(T::DbWeight::get().writes(2))
  }

  fn remove_ark() -> Weight {
    Weight::from_parts(22_000_000, 2200)
      .saturating_add(T::DbWeight::get().reads(3))
      .saturating_add(T::DbWeight::get().writes(2))
  }

  fn set_ark_deposit_cap() -> Weight {
    Weight::from_parts(12_000_000, 900)
      .saturating_add(T::DbWeight::get().reads(1))
      .saturating_add(T::DbWeight::get().writes(1))
  }

  fn set_ark_max_deposit_percentage_of_tvl() -> Weight {
    Weight::from_parts(12_000_000, 900)
      .saturating_add(T::DbWeight::get().reads(1))
      .saturating_add(T::DbWeight::get().writes(1))
  }

  fn set_ark_max_rebalance_inflow() -> Weight {
    Weight::from_parts(12_000_000, 900)
      .saturating_add(T::DbWeight::get().reads(1))
      .saturating_add(T::DbWeight::get().writes(1))
  }

  fn set_ark_max_rebalance_outflow() -> Weight {
    Weight::from_parts(12_000_000, 900)
      .saturating_add(T::DbWeight::get().reads(1))
      .saturating_add(T::DbWeight::get().writes(1))
  }

  fn set_minimum_buffer_balance() -> Weight {
    Weight::from_parts(8_000_000, 600)
      .saturating_add(T::DbWeight::get().reads(1))
      .saturating_add(T::DbWeight::get().writes(1))
  }

  fn update_rebalance_cooldown() -> Weight {
    Weight::from_parts(8_000_000, 600)
      .saturating_add(T::DbWeight::get().reads(1))
      .saturating_add(T::DbWeight::get().writes(1))
  }

  fn set_max_rebalance_operations() -> Weight {
    Weight::from_parts(8_000_000, 600)
      .saturating_add(T::DbWeight::get().reads(1))
      .saturating_add(T::DbWeight::get().writes(1))
  }

  fn set_minimum_rate_difference() -> Weight {
    Weight::from_parts(8_000_000, 600)
      .saturating_add(T::DbWeight::get().reads(1))
      .saturating_add(T::DbWeight::get().writes(1))
  }

  fn set_deposit_cap() -> Weight {
    Weight::from_parts(8_000_000, 600)
      .saturating_add(T::DbWeight::get().reads(1))
      .saturating_add(T::DbWeight::get().writes(1))
  }

  fn set_max_withdrawal_operations() -> Weight {
    Weight::from_parts(8_000_000, 600)
      .saturating_add(T::DbWeight::get().reads(1))
      .saturating_add(T::DbWeight::get().writes(1))
  }

  fn deposit() -> Weight {
    let arks = u64::from(T::MaxArks::get());
    Weight::from_parts(45_000_000, 2600)
      .saturating_add(T::DbWeight::get().reads(arks.saturating_add(6)))
      .saturating_add(T::DbWeight::get().writes(5))
  }

  fn mint() -> Weight {
    let arks = u64::from(T::MaxArks::get());
    Weight::from_parts(45_000_000, 2600)
      .saturating_add(T::DbWeight::get().reads(arks.saturating_add(6)))
      .saturating_add(T::DbWeight::get().writes(5))
  }

  fn withdraw_from_buffer() -> Weight {
    let arks = u64::from(T::MaxArks::get());
    Weight::from_parts(50_000_000, 2600)
      .saturating_add(T::DbWeight::get().reads(arks.saturating_add(6)))
      .saturating_add(T::DbWeight::get().writes(6))
  }

  fn withdraw_from_arks(n: u32) -> Weight {
    let arks = u64::from(T::MaxArks::get());
    Weight::from_parts(50_000_000, 2600)
      .saturating_add(Weight::from_parts(25_000_000, 1200).saturating_mul(u64::from(n)))
      .saturating_add(T::DbWeight::get().reads(arks.saturating_add(7)))
      .saturating_add(T::DbWeight::get().reads(u64::from(n)))
      .saturating_add(T::DbWeight::get().writes(5))
      .saturating_add(T::DbWeight::get().writes(2u64.saturating_mul(u64::from(n))))
  }

  fn approve() -> Weight {
    Weight::from_parts(10_000_000, 700)
      .saturating_add(T::DbWeight::get().writes(1))
  }
}

impl WeightInfo for () {
  fn rebalance(n: u32) -> Weight { Weight::from_parts(30_000_000, 3000).saturating_add(Weight::from_parts(45_000_000, 1500).saturating_mul(u64::from(n))) }
  fn force_rebalance(n: u32) -> Weight { Weight::from_parts(30_000_000, 3000).saturating_add(Weight::from_parts(45_000_000, 1500).saturating_mul(u64::from(n))) }
  fn adjust_buffer(n: u32) -> Weight { Weight::from_parts(30_000_000, 3000).saturating_add(Weight::from_parts(40_000_000, 1500).saturating_mul(u64::from(n))) }
  fn add_ark() -> Weight { Weight::from_parts(18_000_000, 1800) }
  fn remove_ark() -> Weight { Weight::from_parts(22_000_000, 2200) }
  fn set_ark_deposit_cap() -> Weight { Weight::from_parts(12_000_000, 900) }
  fn set_ark_max_deposit_percentage_of_tvl() -> Weight { Weight::from_parts(12_000_000, 900) }
  fn set_ark_max_rebalance_inflow() -> Weight { Weight::from_parts(12_000_000, 900) }
  fn set_ark_max_rebalance_outflow() -> Weight { Weight::from_parts(12_000_000, 900) }
  fn set_minimum_buffer_balance() -> Weight { Weight::from_parts(8_000_000, 600) }
  fn update_rebalance_cooldown() -> Weight { Weight::from_parts(8_000_000, 600) }
  fn set_max_rebalance_operations() -> Weight { Weight::from_parts(8_000_000, 600) }
  fn set_minimum_rate_difference() -> Weight { Weight::from_parts(8_000_000, 600) }
  fn set_deposit_cap() -> Weight { Weight::from_parts(8_000_000, 600) }
  fn set_max_withdrawal_operations() -> Weight { Weight::from_parts(8_000_000, 600) }
  fn deposit() -> Weight { Weight::from_parts(45_000_000, 2600) }
  fn mint() -> Weight { Weight::from_parts(45_000_000, 2600) }
  fn withdraw_from_buffer() -> Weight { Weight::from_parts(50_000_000, 2600) }
  fn withdraw_from_arks(n: u32) -> Weight { Weight::from_parts(50_000_000, 2600).saturating_add(Weight::from_parts(25_000_000, 1200).saturating_mul(u64::from(n))) }
  fn approve() -> Weight { Weight::from_parts(10_000_000, 700) }
}
