#![cfg_attr(not(feature = "std"), no_std)]

pub mod ark;
pub mod ecosystem;

pub use ark::*;
pub use ecosystem::*;
