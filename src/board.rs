//! SiFive HiFive1 Rev B board configuration.

use core::time::Duration;

use crate::device::clint::Clint;
use crate::device::gpio0::Gpio0;
use crate::device::uart0::Uart0;
use crate::mmio::{Bus, Mmio};
use crate::timer::Timer;
use crate::util::bitmask;

// - memory map ---------------------------------------------------------------

pub const CLINT_BASE: usize = 0x0200_0000;
pub const GPIO0_BASE: usize = 0x1001_2000;
pub const UART0_BASE: usize = 0x1001_3000;

// - pins ---------------------------------------------------------------------

pub const LED_RED: u32 = 22;
pub const LED_GREEN: u32 = 19;
pub const LED_BLUE: u32 = 21;
pub const LED_MASK_WHITE: u32 = bitmask(LED_RED) | bitmask(LED_GREEN) | bitmask(LED_BLUE);

/// UART0 receive pin, IOF0.
pub const UART0_RX: u32 = 16;
/// UART0 transmit pin, IOF0.
pub const UART0_TX: u32 = 17;
pub const UART0_PIN_MASK: u32 = bitmask(UART0_RX) | bitmask(UART0_TX);

// - clocks -------------------------------------------------------------------

/// Rate of `mtime`.
pub const RTC_HZ: u64 = 32_768;
/// Peripheral bus clock after reset: the 16 MHz HFXOSC drives `hfclk`
/// undivided, and `tlclk` runs at `hfclk`.
pub const TLCLK_HZ: u32 = 16_000_000;
pub const BAUD_RATE: u32 = 115_200;
pub const BLINK_PERIOD: Duration = Duration::from_secs(1);

/// UART divisor for `baud` at input clock `clock`, rounded to nearest.
pub const fn uart_divisor(clock: u32, baud: u32) -> u16 {
    let div = (clock + baud / 2) / baud - 1;
    assert!(div <= u16::MAX as u32, "baud rate too low for this clock");
    div as u16
}

// - peripherals --------------------------------------------------------------

/// Every peripheral used by the firmware.
#[allow(non_snake_case)]
pub struct Peripherals {
    pub CLINT: Clint<Mmio<CLINT_BASE>>,
    pub GPIO0: Gpio0<Mmio<GPIO0_BASE>>,
    pub UART0: Uart0<Mmio<UART0_BASE>>,
}

static mut TAKEN: bool = false;

impl Peripherals {
    /// Returns the peripherals the first time it is called, `None` after.
    #[inline]
    pub fn take() -> Option<Self> {
        critical_section::with(|_| {
            // Safety: only accessed inside a critical section.
            if unsafe { TAKEN } {
                None
            } else {
                Some(unsafe { Self::steal() })
            }
        })
    }

    /// Returns the peripherals without checking whether they were already
    /// handed out.
    ///
    /// # Safety
    ///
    /// Any other handle to the same peripherals, including one returned by
    /// [`Peripherals::take`], must not be used at the same time as the
    /// registers reached through this one.
    #[inline]
    pub unsafe fn steal() -> Self {
        unsafe {
            TAKEN = true;
            Self {
                CLINT: Clint::new(Mmio),
                GPIO0: Gpio0::new(Mmio),
                UART0: Uart0::new(Mmio),
            }
        }
    }
}

// - blinky -------------------------------------------------------------------

/// Switches the LEDs off and hands their pins to the GPIO block as outputs.
pub fn leds_init<B: Bus>(gpio: &mut Gpio0<B>) {
    gpio.output_val &= !LED_MASK_WHITE;
    gpio.iof_en.clr(LED_MASK_WHITE);
    gpio.output_en |= LED_MASK_WHITE;
}

/// One blink tick. Re-arms the timer one `BLINK_PERIOD` ahead, toggles the
/// LEDs and returns the time of the tick.
pub fn blink<T: Bus, G: Bus, const HZ: u64>(timer: &Timer<T, HZ>, gpio: &mut Gpio0<G>) -> u64 {
    // mtimecmp does not repeat
    timer.set_cmp(BLINK_PERIOD);
    let timestamp = timer.now();
    gpio.output_val ^= LED_MASK_WHITE;
    timestamp
}
