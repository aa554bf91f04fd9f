//! Machine-mode interrupt handlers with captured context.
//!
//! A [`Slot`] holds a monomorphized trampoline for one handler type. The
//! handler itself stays wherever its owner put it; only a pointer to it is
//! parked in a scratch register. [`run`] keeps the handler alive in a frame
//! that never returns, so a closure borrowing drivers from `main` can be used
//! as an interrupt handler without allocation or `'static` state.

use core::cell::Cell;
use core::marker::PhantomData;

use critical_section::Mutex;

/// Register holding the context pointer of the installed handler.
pub trait Scratch {
    fn read() -> usize;
    fn write(value: usize);
}

/// The `mscratch` CSR.
pub struct Mscratch;

impl Scratch for Mscratch {
    #[inline(always)]
    fn read() -> usize {
        riscv::register::mscratch::read()
    }

    #[inline(always)]
    #[allow(unused_unsafe)]
    fn write(value: usize) {
        unsafe { riscv::register::mscratch::write(value) }
    }
}

/// Handler installed on the machine timer interrupt.
pub static MACHINE_TIMER: Slot<Mscratch> = Slot::new();

/// Interrupt handler slot.
pub struct Slot<S: Scratch> {
    trampoline: Mutex<Cell<Option<unsafe fn(usize)>>>,
    _scratch: PhantomData<S>,
}

impl<S: Scratch> Slot<S> {
    pub const fn new() -> Self {
        Self {
            trampoline: Mutex::new(Cell::new(None)),
            _scratch: PhantomData,
        }
    }

    /// Installs `handler`, replacing any previous one.
    ///
    /// # Safety
    ///
    /// `handler` must stay at the same address and must not be used through
    /// any other path until [`Slot::uninstall`] is called or another handler
    /// is installed. Every slot sharing the scratch register `S` must hold
    /// the same handler.
    pub unsafe fn install<F: FnMut()>(&self, handler: &mut F) {
        critical_section::with(|cs| {
            S::write(handler as *mut F as usize);
            self.trampoline.borrow(cs).set(Some(trampoline::<F> as unsafe fn(usize)));
        });
    }

    pub fn uninstall(&self) {
        critical_section::with(|cs| self.trampoline.borrow(cs).set(None));
    }

    /// Calls the installed handler. Returns `false` if there is none.
    #[inline]
    pub fn dispatch(&self) -> bool {
        match critical_section::with(|cs| self.trampoline.borrow(cs).get()) {
            Some(entry) => {
                // Safety: `install` stored the matching context in `S`.
                unsafe { entry(S::read()) };
                true
            }
            None => false,
        }
    }
}

impl<S: Scratch> Default for Slot<S> {
    fn default() -> Self {
        Self::new()
    }
}

unsafe fn trampoline<F: FnMut()>(context: usize) {
    let handler = unsafe { &mut *(context as *mut F) };
    handler();
}

/// Installs `handler` in `slot`, calls `enable` to unmask its interrupt
/// source, then waits for interrupts forever.
pub fn run<S, F, E>(slot: &Slot<S>, mut handler: F, enable: E) -> !
where
    S: Scratch,
    F: FnMut(),
    E: FnOnce(),
{
    // Safety: `handler` lives in this frame, which never returns, and is not
    // touched here again.
    unsafe { slot.install(&mut handler) };
    enable();
    loop {
        #[allow(unused_unsafe)]
        unsafe {
            riscv::asm::wfi()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};

    static SCRATCH: [AtomicUsize; 4] = [
        AtomicUsize::new(0),
        AtomicUsize::new(0),
        AtomicUsize::new(0),
        AtomicUsize::new(0),
    ];

    // One register per test so tests can run in parallel.
    struct TestScratch<const N: usize>;

    impl<const N: usize> Scratch for TestScratch<N> {
        fn read() -> usize {
            SCRATCH[N].load(Ordering::SeqCst)
        }

        fn write(value: usize) {
            SCRATCH[N].store(value, Ordering::SeqCst)
        }
    }

    #[test]
    fn empty_slot() {
        let slot = Slot::<TestScratch<0>>::new();
        assert!(!slot.dispatch());
    }

    #[test]
    fn dispatch_calls_handler() {
        let slot = Slot::<TestScratch<1>>::new();
        let hits = Cell::new(0);
        let mut handler = || hits.set(hits.get() + 1);
        unsafe { slot.install(&mut handler) };
        assert!(slot.dispatch());
        assert!(slot.dispatch());
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn context_pointer_in_scratch() {
        let slot = Slot::<TestScratch<2>>::new();
        let mut log = [0u32; 3];
        let mut next = 0;
        let mut handler = || {
            log[next] = 10 * (next as u32 + 1);
            next += 1;
        };
        let context = &mut handler as *mut _ as usize;
        unsafe { slot.install(&mut handler) };
        assert_eq!(TestScratch::<2>::read(), context);
        slot.dispatch();
        slot.dispatch();
        slot.uninstall();
        drop(handler);
        assert_eq!(log, [10, 20, 0]);
    }

    #[test]
    fn uninstall() {
        let slot = Slot::<TestScratch<3>>::new();
        let hits = Cell::new(0);
        let mut handler = || hits.set(hits.get() + 1);
        unsafe { slot.install(&mut handler) };
        assert!(slot.dispatch());
        slot.uninstall();
        assert!(!slot.dispatch());
        assert_eq!(hits.get(), 1);
    }
}
