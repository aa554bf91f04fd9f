#![allow(non_snake_case)]
#![no_std]
#![no_main]

use riscv::register::{mie, mstatus};

use panic_halt as _;

use hello_fe310::board::{self, BLINK_PERIOD};
use hello_fe310::timer::Timer;
use hello_fe310::{irq, logging, println, Peripherals};

#[riscv_rt::entry]
fn main() -> ! {
    let p = Peripherals::take().unwrap();

    // logging
    logging::init(&p.GPIO0, &p.UART0);
    println!("🦀 Hello HiFive1!");

    // timer - first tick one period from now
    let timer: Timer<_> = Timer::new(p.CLINT);
    timer.set_cmp(BLINK_PERIOD);

    // gpio - leds
    let mut gpio = p.GPIO0;
    board::leds_init(&mut gpio);

    // blinky
    let tick = move || {
        let timestamp = board::blink(&timer, &mut gpio);
        println!("blink @ {}", timestamp);
    };

    irq::run(&irq::MACHINE_TIMER, tick, || unsafe {
        mie::set_mtimer();
        mstatus::set_mie();
    })
}

#[export_name = "MachineTimer"]
extern "C" fn MachineTimer() {
    if !irq::MACHINE_TIMER.dispatch() {
        println!("MachineTimer: no handler");
    }
}
