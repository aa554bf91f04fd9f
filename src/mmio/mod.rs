//! Typed access to memory-mapped registers.
//!
//! Register and field layouts are described by [`RegisterSpec`] and
//! [`FieldSpec`] impls on zero-sized marker types. [`Reg`] and [`Field`]
//! turn those descriptions into volatile accesses through a [`Bus`]. With the
//! [`Mmio`] bus everything resolves at compile time: accessors are
//! zero-sized and each operation is one load, one store or one masked
//! load-modify-store at a constant address.

#[macro_use]
mod macros;

pub mod bus;
pub mod field;
pub mod reg;
pub mod sim;

pub use bus::{Bus, Mmio, RegRaw};
pub use field::{check_field, Access, Field, FieldSpec, FieldValue};
pub use reg::{check_register, High, Low, Reg, RegisterSpec, Word32, Word64};
