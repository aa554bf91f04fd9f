//! Simulated device memory.
//!
//! [`SimMemory`] is a byte buffer standing in for a peripheral's register
//! window. Accessors built over its [`Sim`] bus run exactly the code they run
//! on hardware, and every load and store through the bus is counted, so tests
//! can tell a direct store from a read-modify-write.

use super::bus::{fetch_or_fallback, Bus, RegRaw};
use core::array;
use core::cell::Cell;

/// `N` bytes of simulated register space, initially zero.
pub struct SimMemory<const N: usize> {
    bytes: [Cell<u8>; N],
    loads: Cell<usize>,
    stores: Cell<usize>,
}

impl<const N: usize> SimMemory<N> {
    /// Creates zeroed memory.
    pub fn new() -> Self {
        Self {
            bytes: array::from_fn(|_| Cell::new(0)),
            loads: Cell::new(0),
            stores: Cell::new(0),
        }
    }

    /// A bus whose `fetch_or` behaves like an atomic memory operation and
    /// returns the value from before the OR.
    pub fn bus(&self) -> Sim<'_, N> {
        Sim { memory: self, amo: true }
    }

    /// A bus without atomic memory operations; `fetch_or` takes the
    /// read-modify-write-read fallback.
    pub fn bus_without_amo(&self) -> Sim<'_, N> {
        Sim { memory: self, amo: false }
    }

    /// Reads a `T` at `offset` without counting the access.
    ///
    /// # Panics
    ///
    /// If the value does not fit in the buffer at `offset`.
    pub fn peek<T: RegRaw>(&self, offset: usize) -> T {
        let width = (T::BITS / 8) as usize;
        let bits = self.bytes[offset..offset + width]
            .iter()
            .enumerate()
            .fold(0u64, |bits, (i, byte)| bits | (u64::from(byte.get()) << Self::shift(i, width)));
        T::from_bits(bits)
    }

    /// Writes a `T` at `offset` without counting the access.
    ///
    /// # Panics
    ///
    /// If the value does not fit in the buffer at `offset`.
    pub fn poke<T: RegRaw>(&self, offset: usize, value: T) {
        let width = (T::BITS / 8) as usize;
        let bits = value.into_bits();
        for (i, byte) in self.bytes[offset..offset + width].iter().enumerate() {
            byte.set((bits >> Self::shift(i, width)) as u8);
        }
    }

    /// Number of loads made through a bus since the last reset.
    pub fn loads(&self) -> usize {
        self.loads.get()
    }

    /// Number of stores made through a bus since the last reset.
    pub fn stores(&self) -> usize {
        self.stores.get()
    }

    /// Zeroes the access counters. Memory contents are kept.
    pub fn reset_counters(&self) {
        self.loads.set(0);
        self.stores.set(0);
    }

    // Bit position of byte `i` of a `width`-byte value in native byte order.
    fn shift(i: usize, width: usize) -> u32 {
        let lane = if cfg!(target_endian = "little") { i } else { width - 1 - i };
        lane as u32 * 8
    }
}

impl<const N: usize> Default for SimMemory<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Bus over a [`SimMemory`].
#[derive(Clone, Copy)]
pub struct Sim<'a, const N: usize> {
    memory: &'a SimMemory<N>,
    amo: bool,
}

impl<const N: usize> Bus for Sim<'_, N> {
    unsafe fn load<T: RegRaw>(self, offset: usize) -> T {
        self.memory.loads.set(self.memory.loads.get() + 1);
        self.memory.peek(offset)
    }

    unsafe fn store<T: RegRaw>(self, offset: usize, value: T) {
        self.memory.stores.set(self.memory.stores.get() + 1);
        self.memory.poke(offset, value);
    }

    unsafe fn fetch_or<T: RegRaw>(self, offset: usize, value: T) -> T {
        if !self.amo {
            return unsafe { fetch_or_fallback(self, offset, value) };
        }
        let previous = unsafe { self.load::<T>(offset) };
        unsafe { self.store(offset, previous | value) };
        previous
    }
}
