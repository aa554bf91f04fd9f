//! The blinky firmware's setup and tick, driven against simulated GPIO and
//! CLINT.

use core::cell::Cell;
use core::sync::atomic::{AtomicUsize, Ordering};

use hello_fe310::board::{self, BLINK_PERIOD, LED_MASK_WHITE, RTC_HZ};
use hello_fe310::device::clint::Clint;
use hello_fe310::device::gpio0::Gpio0;
use hello_fe310::irq::{Scratch, Slot};
use hello_fe310::mmio::sim::SimMemory;
use hello_fe310::timer::Timer;

const OUTPUT_EN: usize = 0x08;
const OUTPUT_VAL: usize = 0x0C;
const IOF_EN: usize = 0x38;
const MTIMECMP: usize = 0x4000;
const MTIME: usize = 0xBFF8;

static SCRATCH: AtomicUsize = AtomicUsize::new(0);

struct TestScratch;

impl Scratch for TestScratch {
    fn read() -> usize {
        SCRATCH.load(Ordering::SeqCst)
    }

    fn write(value: usize) {
        SCRATCH.store(value, Ordering::SeqCst)
    }
}

#[test]
fn blink() {
    let gpio_memory = SimMemory::<0x44>::new();
    let clint_memory = SimMemory::<0xC000>::new();
    let mut gpio = unsafe { Gpio0::new(gpio_memory.bus()) };
    let timer: Timer<_> = Timer::new(unsafe { Clint::new(clint_memory.bus()) });

    // some other pin is already an output and high
    gpio_memory.poke::<u32>(OUTPUT_EN, 0x1);
    gpio_memory.poke::<u32>(OUTPUT_VAL, 0x1 | LED_MASK_WHITE);
    gpio_memory.poke::<u32>(IOF_EN, LED_MASK_WHITE);
    clint_memory.poke::<u64>(MTIME, 1_000);

    timer.set_cmp(BLINK_PERIOD);
    assert_eq!(clint_memory.peek::<u64>(MTIMECMP), 1_000 + RTC_HZ);

    board::leds_init(&mut gpio);
    assert_eq!(gpio_memory.peek::<u32>(OUTPUT_VAL), 0x1);
    assert_eq!(gpio_memory.peek::<u32>(IOF_EN), 0);
    assert_eq!(gpio_memory.peek::<u32>(OUTPUT_EN), 0x1 | LED_MASK_WHITE);

    let timestamp = Cell::new(0);
    let mut handler = || timestamp.set(board::blink(&timer, &mut gpio));
    let slot = Slot::<TestScratch>::new();
    unsafe { slot.install(&mut handler) };

    // first tick: leds on, next tick one period later
    clint_memory.poke::<u64>(MTIME, 1_000 + RTC_HZ);
    assert!(slot.dispatch());
    assert_eq!(timestamp.get(), 1_000 + RTC_HZ);
    assert_eq!(gpio_memory.peek::<u32>(OUTPUT_VAL), 0x1 | LED_MASK_WHITE);
    assert_eq!(clint_memory.peek::<u64>(MTIMECMP), 1_000 + 2 * RTC_HZ);

    // second tick: leds off again
    clint_memory.poke::<u64>(MTIME, 1_000 + 2 * RTC_HZ);
    assert!(slot.dispatch());
    assert_eq!(timestamp.get(), 1_000 + 2 * RTC_HZ);
    assert_eq!(gpio_memory.peek::<u32>(OUTPUT_VAL), 0x1);
    assert_eq!(clint_memory.peek::<u64>(MTIMECMP), 1_000 + 3 * RTC_HZ);

    slot.uninstall();
    assert!(!slot.dispatch());
}

#[test]
fn blink_tick_is_late_tolerant() {
    let gpio_memory = SimMemory::<0x44>::new();
    let clint_memory = SimMemory::<0xC000>::new();
    let mut gpio = unsafe { Gpio0::new(gpio_memory.bus()) };
    let timer: Timer<_> = Timer::new(unsafe { Clint::new(clint_memory.bus()) });

    // the tick runs well after its deadline; the next one is a full period
    // after the tick, not after the missed deadline
    clint_memory.poke::<u64>(MTIMECMP, 5_000);
    clint_memory.poke::<u64>(MTIME, 9_000);
    assert_eq!(board::blink(&timer, &mut gpio), 9_000);
    assert_eq!(clint_memory.peek::<u64>(MTIMECMP), 9_000 + RTC_HZ);
    assert!(!timer.is_pending());
    assert_eq!(gpio_memory.peek::<u32>(OUTPUT_VAL), LED_MASK_WHITE);
}
