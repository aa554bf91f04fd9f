use super::bus::{Bus, RegRaw};
use super::reg::RegisterSpec;
use core::fmt;
use core::marker::PhantomData;

/// Type a field value is read into and written from.
pub trait FieldValue: Copy {
    /// Number of bits the type can hold.
    const BITS: u32;

    /// Truncates `bits` to this type. For `bool`, any non-zero value is `true`.
    fn from_bits(bits: u64) -> Self;

    /// Zero-extends `self` to 64 bits.
    fn into_bits(self) -> u64;
}

impl FieldValue for bool {
    const BITS: u32 = 1;

    #[inline(always)]
    fn from_bits(bits: u64) -> bool {
        bits != 0
    }

    #[inline(always)]
    fn into_bits(self) -> u64 {
        u64::from(self)
    }
}

macro_rules! impl_field_value {
    ($($type:ty),*) => {
        $(
            impl FieldValue for $type {
                const BITS: u32 = <$type>::BITS;

                #[inline(always)]
                fn from_bits(bits: u64) -> $type {
                    bits as $type
                }

                #[inline(always)]
                fn into_bits(self) -> u64 {
                    u64::from(self)
                }
            }
        )*
    };
}

impl_field_value!(u8, u16, u32, u64);

/// How [`Field::write`] reaches the hardware.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// The field is the whole register: plain store.
    Whole,
    /// The field is the register's only field: store the formatted value.
    Exclusive,
    /// Other fields share the register: read-modify-write.
    Shared,
}

impl Access {
    /// Picks the cheapest correct strategy for a field.
    pub const fn select(field_width: u32, field_offset: u32, reg_width: u32, field_count: u32) -> Access {
        if field_width == reg_width && field_offset == 0 {
            Access::Whole
        } else if field_count == 1 {
            Access::Exclusive
        } else {
            Access::Shared
        }
    }
}

/// Static shape of one bit-field within a register.
pub trait FieldSpec {
    /// Register the field belongs to.
    type Reg: RegisterSpec;

    /// Smallest type able to hold the field.
    type Value: FieldValue;

    /// Bits of the register occupied by the field.
    const BIT_MASK: u64;

    /// Position of the field's least-significant bit.
    const BIT_OFFSET: u32;

    /// Width of the field in bits.
    const BIT_WIDTH: u32 = Self::BIT_MASK.count_ones();

    /// Write strategy.
    const ACCESS: Access = Access::select(
        Self::BIT_WIDTH,
        Self::BIT_OFFSET,
        <Self::Reg as RegisterSpec>::BIT_WIDTH,
        <Self::Reg as RegisterSpec>::FIELD_COUNT,
    );
}

/// Compile-time validation of a field descriptor: the mask must be one
/// non-empty run of bits starting at `offset`, lie inside the register, and
/// fit in the value type.
pub const fn check_field(mask: u64, offset: u32, value_bits: u32, reg_bits: u32, field_count: u32) {
    assert!(mask != 0, "field mask is empty");
    assert!(field_count != 0, "field belongs to a register declared without fields");
    assert!(reg_bits >= 64 || mask >> reg_bits == 0, "field mask exceeds its register");
    assert!(mask.trailing_zeros() == offset, "field offset is not the lowest bit of its mask");
    let run = mask >> offset;
    assert!(run & run.wrapping_add(1) == 0, "field mask is not contiguous");
    assert!(run.count_ones() <= value_bits, "field value type is narrower than its mask");
}

/// Field accessor: bus `B` at the field described by `F`.
pub struct Field<B: Bus, F: FieldSpec> {
    bus: B,
    _spec: PhantomData<F>,
}

type Raw<F> = <<F as FieldSpec>::Reg as RegisterSpec>::Raw;

impl<B: Bus, F: FieldSpec> Field<B, F> {
    const CHECK: () = check_field(
        F::BIT_MASK,
        F::BIT_OFFSET,
        <F::Value as FieldValue>::BITS,
        <F::Reg as RegisterSpec>::BIT_WIDTH,
        <F::Reg as RegisterSpec>::FIELD_COUNT,
    );

    const OFFSET: usize = <F::Reg as RegisterSpec>::OFFSET;

    /// Binds an accessor for `F` on `bus`.
    ///
    /// # Safety
    ///
    /// `bus` must reach a register laid out as `F::Reg`.
    #[inline(always)]
    pub unsafe fn new(bus: B) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::CHECK;
        Self { bus, _spec: PhantomData }
    }

    /// The field's mask in the register's raw type.
    #[inline(always)]
    pub fn mask(&self) -> Raw<F> {
        <Raw<F> as RegRaw>::from_bits(F::BIT_MASK)
    }

    /// Shifts `value` into position and masks it. Does not touch hardware.
    #[inline(always)]
    pub fn format(&self, value: F::Value) -> Raw<F> {
        <Raw<F> as RegRaw>::from_bits((value.into_bits() << F::BIT_OFFSET) & F::BIT_MASK)
    }

    /// Masks the field out of `raw` and shifts it down to bit 0. Does not
    /// touch hardware.
    #[inline(always)]
    pub fn extract(&self, raw: Raw<F>) -> F::Value {
        <F::Value as FieldValue>::from_bits((raw.into_bits() & F::BIT_MASK) >> F::BIT_OFFSET)
    }

    /// Writes the field.
    ///
    /// A field that is the whole register, or the only field of its register,
    /// is written with a single store. Otherwise this is a read-modify-write
    /// that is not atomic with respect to interrupt handlers.
    #[inline(always)]
    pub fn write(&self, value: F::Value) {
        match F::ACCESS {
            Access::Whole => self.store(<Raw<F> as RegRaw>::from_bits(value.into_bits())),
            Access::Exclusive => self.store(self.format(value)),
            Access::Shared => {
                let raw = self.load();
                self.store(self.format(value) | (raw & !self.mask()));
            }
        }
    }

    /// Sets every bit of the field.
    #[inline(always)]
    pub fn set(&self) {
        if <F::Reg as RegisterSpec>::FIELD_COUNT == 1 {
            self.store(self.mask());
        } else {
            self.store(self.load() | self.mask());
        }
    }

    /// Clears every bit of the field.
    #[inline(always)]
    pub fn clear(&self) {
        if <F::Reg as RegisterSpec>::FIELD_COUNT == 1 {
            self.store(<Raw<F> as Default>::default());
        } else {
            self.store(self.load() & !self.mask());
        }
    }

    /// Reads the field, aligned at bit 0.
    #[inline(always)]
    pub fn read(&self) -> F::Value {
        match F::ACCESS {
            Access::Whole => <F::Value as FieldValue>::from_bits(self.load().into_bits()),
            Access::Exclusive | Access::Shared => self.extract(self.load()),
        }
    }

    /// ORs `value` into the register and returns the field from a snapshot of
    /// the register.
    ///
    /// On RISC-V targets with the "A" extension a 32-bit register is updated
    /// with `amoor.w`, and the snapshot is the value *before* the OR. Anywhere
    /// else the OR is a plain read-modify-write followed by a read-back, and
    /// the snapshot is the value *after* the OR. The two are not equivalent: on
    /// the fallback path a concurrent update between the accesses can be lost,
    /// and the caller cannot tell the field's prior state from the result.
    #[inline(always)]
    pub fn read_after_or(&self, value: Raw<F>) -> F::Value {
        self.extract(unsafe { self.bus.fetch_or(Self::OFFSET, value) })
    }

    #[inline(always)]
    fn load(&self) -> Raw<F> {
        unsafe { self.bus.load(Self::OFFSET) }
    }

    #[inline(always)]
    fn store(&self, raw: Raw<F>) {
        unsafe { self.bus.store(Self::OFFSET, raw) }
    }
}

impl<B: Bus, F: FieldSpec> fmt::Debug for Field<B, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("offset", &Self::OFFSET)
            .field("mask", &F::BIT_MASK)
            .field("access", &F::ACCESS)
            .finish()
    }
}
