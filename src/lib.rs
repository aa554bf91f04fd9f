#![cfg_attr(not(test), no_std)]

#[macro_use]
pub mod mmio;

pub mod board;
pub mod device;
pub mod irq;
pub mod logging;
pub mod timer;
pub mod util;

pub use board::Peripherals;
