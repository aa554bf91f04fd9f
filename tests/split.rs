//! 64-bit registers accessed through their 32-bit halves.

use std::cell::{Cell, RefCell};

use hello_fe310::mmio::{Bus, High, Low, Reg, RegRaw, RegisterSpec, Word64};

type Counter = Word64<0x0>;

const LOW: usize = <Low<Counter> as RegisterSpec>::OFFSET;
const HIGH: usize = <High<Counter> as RegisterSpec>::OFFSET;

/// A free-running counter that advances by `step` on every load.
struct Ticking {
    value: Cell<u64>,
    step: u64,
    stores: RefCell<Vec<(usize, u64)>>,
}

impl Ticking {
    fn new(value: u64, step: u64) -> Self {
        Self {
            value: Cell::new(value),
            step,
            stores: RefCell::new(Vec::new()),
        }
    }
}

#[derive(Clone, Copy)]
struct TickingBus<'a>(&'a Ticking);

impl Bus for TickingBus<'_> {
    unsafe fn load<T: RegRaw>(self, offset: usize) -> T {
        assert_eq!(T::BITS, 32);
        let value = self.0.value.get();
        self.0.value.set(value.wrapping_add(self.0.step));
        let half = match offset {
            LOW => value & 0xFFFF_FFFF,
            HIGH => value >> 32,
            _ => panic!("no register at {offset:#x}"),
        };
        T::from_bits(half)
    }

    unsafe fn store<T: RegRaw>(self, offset: usize, value: T) {
        assert_eq!(T::BITS, 32);
        self.0.stores.borrow_mut().push((offset, value.into_bits()));
    }
}

#[test]
fn read_split_retries_across_a_carry() {
    let counter = Ticking::new(0x0000_0000_FFFF_FFFE, 1);
    let reg = unsafe { Reg::<_, Counter>::new(TickingBus(&counter)) };

    // high 0, low 0xFFFF_FFFF, high 1: torn, so read again
    assert_eq!(reg.read_split(), 0x0000_0001_0000_0002);
}

#[test]
fn read_split_without_carry() {
    let counter = Ticking::new(0x0000_0007_0000_0010, 1);
    let reg = unsafe { Reg::<_, Counter>::new(TickingBus(&counter)) };

    assert_eq!(reg.read_split(), 0x0000_0007_0000_0011);
}

#[test]
fn write_split_order() {
    let counter = Ticking::new(0, 0);
    let reg = unsafe { Reg::<_, Counter>::new(TickingBus(&counter)) };

    reg.write_split(0x0000_0003_0000_0040);
    assert_eq!(
        *counter.stores.borrow(),
        [(LOW, 0xFFFF_FFFF), (HIGH, 0x0000_0003), (LOW, 0x0000_0040)]
    );
}
