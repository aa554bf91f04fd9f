//! Bit twiddling for building register values at compile time.

/// Word with only bit `index` set.
#[inline(always)]
pub const fn bitmask(index: u32) -> u32 {
    assert!(index < u32::BITS);
    1 << index
}

/// Mask of `width` consecutive bits starting at bit `offset`.
#[inline(always)]
pub const fn field_mask(offset: u32, width: u32) -> u64 {
    assert!(width > 0);
    assert!(offset + width <= u64::BITS);
    (u64::MAX >> (u64::BITS - width)) << offset
}
