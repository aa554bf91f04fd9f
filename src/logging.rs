use core::fmt;

use crate::board;
use crate::device::gpio0::Gpio0;
use crate::device::uart0::Uart0;
use crate::mmio::{Bus, Mmio};

/// Routes the UART0 pins and configures UART0 for `BAUD_RATE` 8n1.
pub fn init<G: Bus, U: Bus>(gpio: &Gpio0<G>, uart: &Uart0<U>) {
    // GPIO 16 and 17 to IOF0 (UART0 rx/tx).
    gpio.iof_sel.clr(board::UART0_PIN_MASK);
    gpio.iof_en.set(board::UART0_PIN_MASK);

    uart.div.div().write(board::uart_divisor(board::TLCLK_HZ, board::BAUD_RATE));
    uart.txctrl.nstop().clear();
    uart.txctrl.txen().set();
}

/// Console
pub struct Console<'a, B: Bus>(pub &'a Uart0<B>);

impl<B: Bus> Console<'_, B> {
    /// Queues one byte, waiting for room in the transmit FIFO.
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        let txdata = &self.0.txdata;
        while txdata.full().read() {}
        txdata.write(txdata.data().format(byte));
    }
}

impl<B: Bus> fmt::Write for Console<'_, B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}

/// print!
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::logging::_print(core::format_args!($($arg)*));
    }
}

/// println!
#[macro_export]
macro_rules! println {
    () => {
        $crate::print!("\r\n");
    };
    ($($arg:tt)*) => {
        $crate::logging::_print(core::format_args!($($arg)*));
        $crate::print!("\r\n");
    }
}

/// _print
#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    use fmt::Write;
    // Only ever writes `txdata`, which tolerates a second owner.
    let uart = unsafe { Uart0::new(Mmio::<{ board::UART0_BASE }>) };
    Console(&uart).write_fmt(args).ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mmio::sim::SimMemory;
    use core::fmt::Write;

    const TXDATA: usize = 0x00;
    const TXCTRL: usize = 0x08;
    const DIV: usize = 0x18;
    const IOF_EN: usize = 0x38;
    const IOF_SEL: usize = 0x3C;

    #[test]
    fn init_configures_pins_and_uart() {
        let gpio_memory = SimMemory::<0x44>::new();
        let uart_memory = SimMemory::<0x1C>::new();
        gpio_memory.poke::<u32>(IOF_SEL, 0xFFFF_FFFF);
        gpio_memory.poke::<u32>(IOF_EN, 0x0000_0001);
        uart_memory.poke::<u32>(TXCTRL, 0x0001_0002);
        let (gpio, uart) = unsafe { (Gpio0::new(gpio_memory.bus()), Uart0::new(uart_memory.bus())) };

        init(&gpio, &uart);

        assert_eq!(gpio_memory.peek::<u32>(IOF_SEL), 0xFFFC_FFFF);
        assert_eq!(gpio_memory.peek::<u32>(IOF_EN), 0x0003_0001);
        assert_eq!(uart_memory.peek::<u32>(DIV), 138);
        // txcnt untouched, one stop bit, transmitter on
        assert_eq!(uart_memory.peek::<u32>(TXCTRL), 0x0001_0001);
    }

    #[test]
    fn console_writes_txdata() {
        let memory = SimMemory::<0x1C>::new();
        let uart = unsafe { Uart0::new(memory.bus()) };
        let mut console = Console(&uart);

        write!(console, "{}{}", 4, 2).unwrap();
        assert_eq!(memory.peek::<u32>(TXDATA), u32::from(b'2'));
        // one poll of `full` and one store per byte
        assert_eq!((memory.loads(), memory.stores()), (2, 2));
    }

    #[test]
    fn console_writes_one_byte_per_store() {
        let memory = SimMemory::<0x1C>::new();
        let uart = unsafe { Uart0::new(memory.bus()) };
        let mut console = Console(&uart);

        console.write_str("hello\r\n").unwrap();
        assert_eq!(memory.stores(), 7);
        assert_eq!(memory.peek::<u32>(TXDATA), u32::from(b'\n'));
    }
}
