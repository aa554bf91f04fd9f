//! Machine-mode timer driver.

use core::time::Duration;

use crate::board::RTC_HZ;
use crate::device::clint::Clint;
use crate::mmio::Bus;

/// Number of `HZ` ticks in `period`, rounded down. Saturates at `u64::MAX`.
pub const fn ticks<const HZ: u64>(period: Duration) -> u64 {
    let fraction = (period.subsec_nanos() as u128 * HZ as u128 / 1_000_000_000) as u64;
    period.as_secs().saturating_mul(HZ).saturating_add(fraction)
}

/// The CLINT's `mtime`/`mtimecmp` pair, counting at `HZ`.
///
/// The timer interrupt is level triggered and pending while
/// `mtime >= mtimecmp`, so a handler must move the compare value forward
/// before returning.
pub struct Timer<B: Bus, const HZ: u64 = RTC_HZ> {
    clint: Clint<B>,
}

impl<B: Bus, const HZ: u64> Timer<B, HZ> {
    pub fn new(clint: Clint<B>) -> Self {
        Self { clint }
    }

    /// Releases the CLINT.
    pub fn free(self) -> Clint<B> {
        self.clint
    }

    /// Current value of `mtime`.
    #[inline]
    pub fn now(&self) -> u64 {
        self.clint.mtime.read_split()
    }

    /// Schedules the timer interrupt `period` from now. A period past the end
    /// of the counter schedules it for `u64::MAX`.
    #[inline]
    pub fn set_cmp(&self, period: Duration) {
        self.set_cmp_ticks(self.now().saturating_add(ticks::<HZ>(period)));
    }

    /// Schedules the timer interrupt for when `mtime` reaches `ticks`.
    #[inline]
    pub fn set_cmp_ticks(&self, ticks: u64) {
        self.clint.mtimecmp.write_split(ticks);
    }

    /// Current value of `mtimecmp`.
    #[inline]
    pub fn cmp(&self) -> u64 {
        self.clint.mtimecmp.read_split()
    }

    /// Whether the timer interrupt condition holds.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.now() >= self.cmp()
    }

    /// Raises or lowers the machine software interrupt.
    #[inline]
    pub fn software_interrupt(&self, raise: bool) {
        self.clint.msip.msip().write(raise);
    }
}
