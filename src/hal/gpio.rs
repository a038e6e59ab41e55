use avr_device::atmega128a::{PORTA, PORTB, PORTC, PORTD};
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::OutputPin;

pub struct Input;
pub struct Output;

#[derive(Debug)]
pub struct Pin<PORT, const P: u8, MODE> {
    _port: PhantomData<PORT>,
    _mode: PhantomData<MODE>,
}

impl<PORT, const P: u8, MODE> Pin<PORT, P, MODE> {
    /// Pins are handed out once, from `board::Pins::take`.
    const fn new() -> Self {
        Self {
            _port: PhantomData,
            _mode: PhantomData,
        }
    }
}

macro_rules! impl_port {
    ($PORT:ident, $port:ident, $ddr:ident) => {
        impl<const P: u8> Pin<$PORT, P, Input> {
            pub fn into_output(self) -> Pin<$PORT, P, Output> {
                unsafe {
                    let p = $PORT::ptr();
                    (*p).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                    (*p).$ddr.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Pin::new()
            }

            /// Input with the internal pull-up enabled.
            pub fn into_pull_up(self) -> Self {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                self
            }
        }

        impl<const P: u8> OutputPin for Pin<$PORT, P, Output> {
            type Error = Infallible;

            #[inline]
            fn set_high(&mut self) -> Result<(), Infallible> {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | (1 << P)));
                }
                Ok(())
            }

            #[inline]
            fn set_low(&mut self) -> Result<(), Infallible> {
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !(1 << P)));
                }
                Ok(())
            }
        }
    };
}

impl_port!(PORTA, porta, ddra);
impl_port!(PORTB, portb, ddrb);
impl_port!(PORTC, portc, ddrc);
impl_port!(PORTD, portd, ddrd);

/// Geiger board wiring.
pub mod board {
    use super::*;

    // 74HC595 feeding the display segments
    pub type ShiftData = Pin<PORTA, 0, Input>;
    pub type ShiftClock = Pin<PORTA, 1, Input>;
    pub type StoreClock = Pin<PORTA, 2, Input>;

    // Digit select, active low, digit 3 on PC0
    pub type Digit3 = Pin<PORTC, 0, Input>;
    pub type Digit2 = Pin<PORTC, 1, Input>;
    pub type Digit1 = Pin<PORTC, 2, Input>;
    pub type Digit0 = Pin<PORTC, 3, Input>;

    pub type PulseLed = Pin<PORTB, 5, Input>;

    /// GM tube output, falling edge on INT0
    pub type GmPulse = Pin<PORTD, 0, Input>;

    pub struct Pins {
        pub shift_data: ShiftData,
        pub shift_clock: ShiftClock,
        pub store_clock: StoreClock,
        pub digits: (Digit3, Digit2, Digit1, Digit0),
        pub pulse_led: PulseLed,
        pub gm_pulse: GmPulse,
    }

    impl Pins {
        /// Takes the port peripherals so nothing else can drive them.
        pub fn take(_a: PORTA, _b: PORTB, _c: PORTC, _d: PORTD) -> Self {
            Self {
                shift_data: Pin::new(),
                shift_clock: Pin::new(),
                store_clock: Pin::new(),
                digits: (Pin::new(), Pin::new(), Pin::new(), Pin::new()),
                pulse_led: Pin::new(),
                gm_pulse: Pin::new(),
            }
        }
    }
}
