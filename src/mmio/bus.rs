//! # Buses
//!
//! A bus decides how a register offset turns into a memory access. On
//! hardware that is [`Mmio`], a zero-sized type carrying the peripheral's
//! base address as a const generic, so every accessor built on it is
//! zero-sized too and each access compiles to a single `lw`/`sw` at a
//! constant address. Tests use [`Sim`](super::sim::Sim) instead, which points
//! the same accessor logic at a byte buffer.

use core::fmt::Debug;
use core::ops::{BitAnd, BitOr, BitXor, Not};
use core::ptr::{read_volatile, write_volatile};

/// Raw register storage type.
pub trait RegRaw
where
    Self: Debug
        + Copy
        + Default
        + Eq
        + BitAnd<Output = Self>
        + BitOr<Output = Self>
        + BitXor<Output = Self>
        + Not<Output = Self>,
{
    /// Size of the type in bits.
    const BITS: u32;

    /// Truncates `bits` to this type.
    fn from_bits(bits: u64) -> Self;

    /// Zero-extends `self` to 64 bits.
    fn into_bits(self) -> u64;

    /// Atomically ORs `value` into `*ptr` and returns the previous value, or
    /// `None` if the target has no atomic memory operation for this width.
    ///
    /// # Safety
    ///
    /// `ptr` must be valid for a volatile read and write of `Self`.
    #[inline(always)]
    unsafe fn amo_or(ptr: *mut Self, value: Self) -> Option<Self> {
        let _ = (ptr, value);
        None
    }
}

impl RegRaw for u32 {
    const BITS: u32 = u32::BITS;

    #[inline(always)]
    fn from_bits(bits: u64) -> u32 {
        bits as u32
    }

    #[inline(always)]
    fn into_bits(self) -> u64 {
        u64::from(self)
    }

    #[cfg(all(any(target_arch = "riscv32", target_arch = "riscv64"), target_feature = "a"))]
    #[inline(always)]
    unsafe fn amo_or(ptr: *mut u32, value: u32) -> Option<u32> {
        let previous: u32;
        // Safety: the caller guarantees `ptr` names a readable and writable word.
        unsafe {
            core::arch::asm!(
                "amoor.w {previous}, {value}, ({ptr})",
                previous = out(reg) previous,
                value = in(reg) value,
                ptr = in(reg) ptr,
                options(nostack),
            );
        }
        Some(previous)
    }
}

impl RegRaw for u64 {
    const BITS: u32 = u64::BITS;

    #[inline(always)]
    fn from_bits(bits: u64) -> u64 {
        bits
    }

    #[inline(always)]
    fn into_bits(self) -> u64 {
        self
    }
}

/// Something registers can be accessed through.
///
/// All methods take an `offset` in bytes from the start of the peripheral.
pub trait Bus: Copy {
    /// Volatile load of a `T` at `offset`.
    ///
    /// # Safety
    ///
    /// There must be a readable register of type `T` at `offset`.
    unsafe fn load<T: RegRaw>(self, offset: usize) -> T;

    /// Volatile store of `value` at `offset`.
    ///
    /// # Safety
    ///
    /// There must be a writable register of type `T` at `offset`.
    unsafe fn store<T: RegRaw>(self, offset: usize, value: T);

    /// ORs `value` into the register at `offset` and returns a snapshot of the
    /// register.
    ///
    /// Buses with an atomic memory operation return the value from *before*
    /// the OR. The default implementation is not atomic: it reads, ORs, writes
    /// and then reads the register back, returning the value from *after* the
    /// OR. Anything that modifies the register in between (an interrupt
    /// handler, the hardware itself) can be lost or folded into the result.
    ///
    /// # Safety
    ///
    /// There must be a readable and writable register of type `T` at `offset`.
    #[inline(always)]
    unsafe fn fetch_or<T: RegRaw>(self, offset: usize, value: T) -> T {
        unsafe { fetch_or_fallback(self, offset, value) }
    }
}

/// Non-atomic OR-then-read-back. See [`Bus::fetch_or`].
///
/// # Safety
///
/// Same as [`Bus::fetch_or`].
#[inline(always)]
pub unsafe fn fetch_or_fallback<B: Bus, T: RegRaw>(bus: B, offset: usize, value: T) -> T {
    unsafe {
        bus.store(offset, bus.load::<T>(offset) | value);
        bus.load(offset)
    }
}

/// Memory-mapped bus at a fixed base address.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mmio<const BASE: usize>;

impl<const BASE: usize> Mmio<BASE> {
    /// Base address of the peripheral behind this bus.
    pub const BASE: usize = BASE;

    #[inline(always)]
    fn ptr<T>(offset: usize) -> *mut T {
        (BASE + offset) as *mut T
    }
}

impl<const BASE: usize> Bus for Mmio<BASE> {
    #[inline(always)]
    unsafe fn load<T: RegRaw>(self, offset: usize) -> T {
        unsafe { read_volatile(Self::ptr(offset)) }
    }

    #[inline(always)]
    unsafe fn store<T: RegRaw>(self, offset: usize, value: T) {
        unsafe { write_volatile(Self::ptr(offset), value) }
    }

    #[inline(always)]
    unsafe fn fetch_or<T: RegRaw>(self, offset: usize, value: T) -> T {
        unsafe {
            match T::amo_or(Self::ptr(offset), value) {
                Some(previous) => previous,
                None => fetch_or_fallback(self, offset, value),
            }
        }
    }
}
