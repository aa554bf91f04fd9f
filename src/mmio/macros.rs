/// Expands to `1` for any token. Used to count fields.
macro_rules! one {
    ($_:tt) => {
        1
    };
}

/// Declares a peripheral from its register map.
///
/// ```ignore
/// periph! {
///     /// Doc comment for the peripheral struct.
///     pub mod uart0::Uart0 {
///         /// Opaque register: offset and storage type only.
///         ie: Ie @ 0x10 => u32,
///         /// Register with fields: `name: Type => value type [mask, offset]`.
///         txctrl: TxCtrl @ 0x08 => u32 {
///             txen: Txen => bool [0x0000_0001, 0],
///             txcnt: Txcnt => u8 [0x0007_0000, 16],
///         },
///     }
/// }
/// ```
///
/// For each register this generates a descriptor type implementing
/// `RegisterSpec` (with `FIELD_COUNT` counted from the declaration), a
/// sub-module named after the register holding one `FieldSpec` type per
/// field, and one accessor method per field on `Reg<B, Descriptor>`. Field
/// names must not clash with `Reg`'s own methods.
///
/// The peripheral struct has one public `Reg` per register, in declaration
/// order, all on the same bus. It is deliberately neither `Copy` nor `Clone`.
macro_rules! periph {
    (
        $(#[$periph_meta:meta])*
        $vis:vis mod $module:ident::$periph:ident {
            $(
                $(#[$reg_meta:meta])*
                $reg:ident: $Reg:ident @ $offset:literal => $raw:ty
                $({
                    $(
                        $(#[$field_meta:meta])*
                        $field:ident: $Field:ident => $value:ty [$mask:expr, $shift:literal]
                    ),* $(,)?
                })?
            ),* $(,)?
        }
    ) => {
        $(#[$periph_meta])*
        $vis mod $module {
            $(
                $(#[$reg_meta])*
                pub struct $Reg;

                impl $crate::mmio::RegisterSpec for $Reg {
                    type Raw = $raw;
                    const OFFSET: usize = $offset;
                    const FIELD_COUNT: u32 = 0 $($(+ one!($field))*)?;
                }

                $(
                    #[doc = concat!("Fields of [`", stringify!($Reg), "`].")]
                    pub mod $reg {
                        $(
                            $(#[$field_meta])*
                            pub struct $Field;

                            impl $crate::mmio::FieldSpec for $Field {
                                type Reg = super::$Reg;
                                type Value = $value;
                                const BIT_MASK: u64 = $mask;
                                const BIT_OFFSET: u32 = $shift;
                            }
                        )*
                    }

                    impl<B: $crate::mmio::Bus> $crate::mmio::Reg<B, $Reg> {
                        $(
                            $(#[$field_meta])*
                            #[inline(always)]
                            pub fn $field(&self) -> $crate::mmio::Field<B, $reg::$Field> {
                                self.field()
                            }
                        )*
                    }
                )?
            )*

            $(#[$periph_meta])*
            pub struct $periph<B: $crate::mmio::Bus> {
                $(
                    $(#[$reg_meta])*
                    pub $reg: $crate::mmio::Reg<B, $Reg>,
                )*
            }

            impl<B: $crate::mmio::Bus> $periph<B> {
                /// Binds every register of the peripheral on `bus`.
                ///
                /// # Safety
                ///
                /// `bus` must reach this peripheral's register window, and no
                /// other handle to the same peripheral may be in use.
                #[inline(always)]
                pub unsafe fn new(bus: B) -> Self {
                    Self {
                        $($reg: unsafe { $crate::mmio::Reg::new(bus) },)*
                    }
                }
            }

            impl<B: $crate::mmio::Bus> core::fmt::Debug for $periph<B> {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    f.debug_struct(stringify!($periph))
                        $(.field(stringify!($reg), &self.$reg))*
                        .finish()
                }
            }
        }
    };
}
