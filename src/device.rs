//! FE310-G002 register maps.
//!
//! Offsets and bit positions follow the SiFive FE310-G002 manual.

periph! {
    /// General purpose I/O controller. Every register holds one bit per pin.
    pub mod gpio0::Gpio0 {
        /// Pin value.
        input_val: InputVal @ 0x00 => u32,
        /// Pin input enable.
        input_en: InputEn @ 0x04 => u32,
        /// Pin output enable.
        output_en: OutputEn @ 0x08 => u32,
        /// Output value.
        output_val: OutputVal @ 0x0C => u32,
        /// Internal pull-up enable.
        pue: Pue @ 0x10 => u32,
        /// Pin drive strength.
        ds: Ds @ 0x14 => u32,
        /// Rise interrupt enable.
        rise_ie: RiseIe @ 0x18 => u32,
        /// Rise interrupt pending.
        rise_ip: RiseIp @ 0x1C => u32,
        /// Fall interrupt enable.
        fall_ie: FallIe @ 0x20 => u32,
        /// Fall interrupt pending.
        fall_ip: FallIp @ 0x24 => u32,
        /// High interrupt enable.
        high_ie: HighIe @ 0x28 => u32,
        /// High interrupt pending.
        high_ip: HighIp @ 0x2C => u32,
        /// Low interrupt enable.
        low_ie: LowIe @ 0x30 => u32,
        /// Low interrupt pending.
        low_ip: LowIp @ 0x34 => u32,
        /// I/O function enable.
        iof_en: IofEn @ 0x38 => u32,
        /// I/O function select: 0 selects IOF0, 1 selects IOF1.
        iof_sel: IofSel @ 0x3C => u32,
        /// Output XOR (invert).
        out_xor: OutXor @ 0x40 => u32,
    }
}

periph! {
    /// Universal asynchronous receiver/transmitter.
    pub mod uart0::Uart0 {
        /// Transmit data.
        txdata: TxData @ 0x00 => u32 {
            /// Byte to transmit.
            data: Data => u8 [crate::util::field_mask(0, 8), 0],
            /// Transmit FIFO full. Writes to `data` are ignored while set.
            full: Full => bool [0x8000_0000, 31],
        },
        /// Receive data.
        rxdata: RxData @ 0x04 => u32 {
            /// Received byte.
            data: Data => u8 [crate::util::field_mask(0, 8), 0],
            /// Receive FIFO empty. `data` is not valid while set.
            empty: Empty => bool [0x8000_0000, 31],
        },
        /// Transmit control.
        txctrl: TxCtrl @ 0x08 => u32 {
            /// Transmit enable.
            txen: Txen => bool [0x0000_0001, 0],
            /// Number of stop bits: 0 for one, 1 for two.
            nstop: Nstop => bool [0x0000_0002, 1],
            /// Transmit watermark level.
            txcnt: Txcnt => u8 [crate::util::field_mask(16, 3), 16],
        },
        /// Receive control.
        rxctrl: RxCtrl @ 0x0C => u32 {
            /// Receive enable.
            rxen: Rxen => bool [0x0000_0001, 0],
            /// Receive watermark level.
            rxcnt: Rxcnt => u8 [crate::util::field_mask(16, 3), 16],
        },
        /// Interrupt enable.
        ie: Ie @ 0x10 => u32 {
            /// Transmit watermark interrupt enable.
            txwm: Txwm => bool [0x0000_0001, 0],
            /// Receive watermark interrupt enable.
            rxwm: Rxwm => bool [0x0000_0002, 1],
        },
        /// Interrupt pending.
        ip: Ip @ 0x14 => u32 {
            /// Transmit watermark interrupt pending.
            txwm: Txwm => bool [0x0000_0001, 0],
            /// Receive watermark interrupt pending.
            rxwm: Rxwm => bool [0x0000_0002, 1],
        },
        /// Baud rate divisor: `f_baud = f_in / (div + 1)`.
        div: Div @ 0x18 => u32 {
            /// Divisor.
            div: Div => u16 [crate::util::field_mask(0, 16), 0],
        },
    }
}

periph! {
    /// Core-local interruptor: machine software interrupt and timer.
    pub mod clint::Clint {
        /// Machine software interrupt pending.
        msip: Msip @ 0x0000 => u32 {
            /// Raises the machine software interrupt while set.
            msip: Msip => bool [0x0000_0001, 0],
        },
        /// Machine timer compare. The timer interrupt is pending while
        /// `mtime >= mtimecmp`.
        mtimecmp: MtimeCmp @ 0x4000 => u64,
        /// Machine timer, counting at the real-time clock rate.
        mtime: Mtime @ 0xBFF8 => u64,
    }
}
