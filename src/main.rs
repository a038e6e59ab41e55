#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(target_arch = "avr")]
mod firmware {
    use avr_device::atmega128a::{Peripherals, PORTA, PORTB, PORTC};
    use avr_device::interrupt::{self, Mutex};
    use core::cell::RefCell;
    use panic_halt as _;

    use geiger_firmware::application::{self, App, AppScheduler, Board};
    use geiger_firmware::config::MAX_EVENTS;
    use geiger_firmware::drivers::{BubbleDisplay, SerialConsole, ShiftRegister};
    use geiger_firmware::hal::{board, exint, Output, Pin, Power, PulseIndicator, Timer1, Tone0, Usart0};
    use geiger_firmware::logger::{Level, Logger};
    use geiger_firmware::rtos::Scheduler;

    struct GeigerBoard;

    impl Board for GeigerBoard {
        type Digits = (
            Pin<PORTC, 0, Output>,
            Pin<PORTC, 1, Output>,
            Pin<PORTC, 2, Output>,
            Pin<PORTC, 3, Output>,
        );
        type Segments = ShiftRegister<Pin<PORTA, 0, Output>, Pin<PORTA, 1, Output>, Pin<PORTA, 2, Output>>;
        type Serial = SerialConsole<Usart0>;
        type Indicator = PulseIndicator<Pin<PORTB, 5, Output>>;
    }

    type FirmwareScheduler = AppScheduler<Timer1, GeigerBoard>;

    // Shared between main and both ISRs
    static SCHEDULER: Mutex<RefCell<Option<FirmwareScheduler>>> = Mutex::new(RefCell::new(None));

    #[avr_device::entry]
    fn main() -> ! {
        let dp = Peripherals::take().unwrap();
        let pins = board::Pins::take(dp.PORTA, dp.PORTB, dp.PORTC, dp.PORTD);

        let segments = ShiftRegister::new(
            pins.shift_data.into_output(),
            pins.shift_clock.into_output(),
            pins.store_clock.into_output(),
        );
        let (d3, d2, d1, d0) = pins.digits;
        let digits = (d3.into_output(), d2.into_output(), d1.into_output(), d0.into_output());
        let indicator = PulseIndicator::new(pins.pulse_led.into_output(), Tone0::new(dp.TC0));
        let _gm_pulse = pins.gm_pulse.into_pull_up();

        let app: App<GeigerBoard> = App::new(
            BubbleDisplay::new(digits, segments),
            SerialConsole::new(Usart0::new(dp.USART0)),
            indicator,
            Logger::default(),
        );
        let mut scheduler: FirmwareScheduler = Scheduler::new(Timer1::new(dp.TC1), app);
        scheduler.initialize();

        #[cfg(feature = "geiger")]
        let started = application::start_geiger(&mut scheduler);
        #[cfg(not(feature = "geiger"))]
        let started = application::start_counter(&mut scheduler);

        if started.is_err() {
            let app = scheduler.context_mut();
            app.logger
                .log(&mut app.serial, Level::Error, "event slots", MAX_EVENTS as u32)
                .ok();
        }

        #[cfg(feature = "geiger")]
        exint::enable_int0_falling(&dp.EXINT);

        interrupt::free(|cs| {
            SCHEDULER.borrow(cs).replace(Some(scheduler));
        });

        let mut power = Power::new(dp.CPU);
        unsafe { interrupt::enable() };

        loop {
            power.idle();
        }
    }

    #[avr_device::interrupt(atmega128a)]
    fn TIMER1_COMPA() {
        interrupt::free(|cs| {
            if let Some(scheduler) = SCHEDULER.borrow(cs).borrow_mut().as_mut() {
                scheduler.dispatch();
            }
        });
    }

    #[avr_device::interrupt(atmega128a)]
    fn INT0() {
        interrupt::free(|cs| {
            if let Some(scheduler) = SCHEDULER.borrow(cs).borrow_mut().as_mut() {
                application::pulse(scheduler);
            }
        });
    }
}

// The firmware only exists for the AVR target; host builds run the library tests.
#[cfg(not(target_arch = "avr"))]
fn main() {}
