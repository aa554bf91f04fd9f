use super::bus::{Bus, RegRaw};
use super::field::{Field, FieldSpec};
use core::fmt;
use core::marker::PhantomData;
use core::ops::{BitAndAssign, BitOrAssign, BitXorAssign};

/// Static shape of one hardware register.
///
/// Implemented on zero-sized marker types; nothing of this trait exists at
/// runtime.
pub trait RegisterSpec {
    /// Storage type, which is also the access width.
    type Raw: RegRaw;

    /// Byte offset from the peripheral base.
    const OFFSET: usize;

    /// Number of fields declared in the register. Zero means the register is
    /// one opaque value.
    const FIELD_COUNT: u32;

    /// Width of the register in bits.
    const BIT_WIDTH: u32 = <Self::Raw as RegRaw>::BITS;
}

/// Compile-time validation of a register descriptor.
pub const fn check_register(offset: usize, bit_width: u32) {
    assert!(bit_width == 32 || bit_width == 64, "registers are 32 or 64 bits wide");
    assert!(offset % (bit_width as usize / 8) == 0, "register offset is not naturally aligned");
}

/// A 32-bit register with no declared fields.
pub struct Word32<const OFFSET: usize>;

impl<const OFFSET: usize> RegisterSpec for Word32<OFFSET> {
    type Raw = u32;
    const OFFSET: usize = OFFSET;
    const FIELD_COUNT: u32 = 0;
}

/// A 64-bit register with no declared fields, mapped on a 32-bit bus.
pub struct Word64<const OFFSET: usize>;

impl<const OFFSET: usize> RegisterSpec for Word64<OFFSET> {
    type Raw = u64;
    const OFFSET: usize = OFFSET;
    const FIELD_COUNT: u32 = 0;
}

/// Low-order 32-bit half of the 64-bit register `R`.
pub struct Low<R>(PhantomData<R>);

/// High-order 32-bit half of the 64-bit register `R`.
pub struct High<R>(PhantomData<R>);

impl<R: RegisterSpec<Raw = u64>> RegisterSpec for Low<R> {
    type Raw = u32;
    const OFFSET: usize = R::OFFSET + if cfg!(target_endian = "little") { 0 } else { 4 };
    const FIELD_COUNT: u32 = 0;
}

impl<R: RegisterSpec<Raw = u64>> RegisterSpec for High<R> {
    type Raw = u32;
    const OFFSET: usize = R::OFFSET + if cfg!(target_endian = "little") { 4 } else { 0 };
    const FIELD_COUNT: u32 = 0;
}

/// Register accessor: bus `B` at the location described by `R`.
///
/// Over [`Mmio`](super::Mmio) this is zero-sized and every method is one or
/// two volatile accesses. Read-modify-write methods are not atomic; an
/// interrupt handler writing the same register in between loses one of the
/// two updates.
pub struct Reg<B: Bus, R: RegisterSpec> {
    bus: B,
    _spec: PhantomData<R>,
}

impl<B: Bus, R: RegisterSpec> Reg<B, R> {
    const CHECK: () = check_register(R::OFFSET, R::BIT_WIDTH);

    /// Binds an accessor for `R` on `bus`.
    ///
    /// # Safety
    ///
    /// `bus` must reach a register laid out as `R`, and the caller must not
    /// build a second accessor for it that can be used concurrently.
    #[inline(always)]
    pub unsafe fn new(bus: B) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CHECK;
        Self { bus, _spec: PhantomData }
    }

    /// Byte offset of the register from the peripheral base.
    #[inline(always)]
    pub const fn offset(&self) -> usize {
        R::OFFSET
    }

    /// Overwrites the register.
    #[inline(always)]
    pub fn write(&self, value: R::Raw) {
        unsafe { self.bus.store(R::OFFSET, value) }
    }

    /// Reads the register.
    #[inline(always)]
    pub fn read(&self) -> R::Raw {
        unsafe { self.bus.load(R::OFFSET) }
    }

    /// Sets the bits present in `value`, leaving the others unchanged.
    #[inline(always)]
    pub fn set(&self, value: R::Raw) {
        self.write(self.read() | value);
    }

    /// Clears the bits present in `value`, leaving the others unchanged.
    #[inline(always)]
    pub fn clr(&self, value: R::Raw) {
        self.write(self.read() & !value);
    }

    /// Inverts the bits present in `value`, leaving the others unchanged.
    #[inline(always)]
    pub fn toggle(&self, value: R::Raw) {
        self.write(self.read() ^ value);
    }

    /// Reads the register, passes the value to `f` and writes back the result.
    #[inline(always)]
    pub fn modify<F>(&self, f: F)
    where
        F: FnOnce(R::Raw) -> R::Raw,
    {
        self.write(f(self.read()));
    }

    /// Returns the accessor for field `F` of this register.
    #[inline(always)]
    pub fn field<F: FieldSpec<Reg = R>>(&self) -> Field<B, F> {
        unsafe { Field::new(self.bus) }
    }
}

impl<B: Bus, R: RegisterSpec<Raw = u64>> Reg<B, R> {
    /// Accessor for the low-order half.
    #[inline(always)]
    pub fn low(&self) -> Reg<B, Low<R>> {
        unsafe { Reg::new(self.bus) }
    }

    /// Accessor for the high-order half.
    #[inline(always)]
    pub fn high(&self) -> Reg<B, High<R>> {
        unsafe { Reg::new(self.bus) }
    }

    /// Reads a free-running 64-bit counter through its 32-bit halves without
    /// tearing across a carry from the low half.
    #[inline]
    pub fn read_split(&self) -> u64 {
        let (low, high) = (self.low(), self.high());
        loop {
            let hi = high.read();
            let lo = low.read();
            if high.read() == hi {
                return (u64::from(hi) << 32) | u64::from(lo);
            }
        }
    }

    /// Writes a 64-bit compare value through its 32-bit halves. The register
    /// never holds a value smaller than both the old and the new one.
    #[inline]
    pub fn write_split(&self, value: u64) {
        let (low, high) = (self.low(), self.high());
        low.write(u32::MAX);
        high.write((value >> 32) as u32);
        low.write(value as u32);
    }
}

impl<B: Bus, R: RegisterSpec> BitOrAssign<R::Raw> for Reg<B, R> {
    #[inline(always)]
    fn bitor_assign(&mut self, value: R::Raw) {
        self.set(value);
    }
}

impl<B: Bus, R: RegisterSpec> BitAndAssign<R::Raw> for Reg<B, R> {
    #[inline(always)]
    fn bitand_assign(&mut self, value: R::Raw) {
        self.write(self.read() & value);
    }
}

impl<B: Bus, R: RegisterSpec> BitXorAssign<R::Raw> for Reg<B, R> {
    #[inline(always)]
    fn bitxor_assign(&mut self, value: R::Raw) {
        self.toggle(value);
    }
}

impl<B: Bus, R: RegisterSpec> fmt::Debug for Reg<B, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reg").field("offset", &R::OFFSET).finish()
    }
}
