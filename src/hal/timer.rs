//! Timer1 as the scheduler tick source and Timer0 as the piezo tone generator.

use avr_device::atmega128a::{TC0, TC1};

use crate::rtos::TickTimer;

// TCCR1B
const WGM12: u8 = 1 << 3;
const CS11: u8 = 1 << 1;
// TIMSK / TIFR
const OCIE1A: u8 = 1 << 4;
const OCF1A: u8 = 1 << 4;

// TCCR0
const WGM01: u8 = 1 << 3;
const COM00: u8 = 1 << 4;
const CS0_DIV32: u8 = 0x03;

/// 16-bit Timer1 in CTC mode on OCR1A, clk/8.
pub struct Timer1 {
    _tc1: TC1,
}

impl Timer1 {
    pub fn new(tc1: TC1) -> Self {
        Self { _tc1: tc1 }
    }
}

impl TickTimer for Timer1 {
    fn configure(&mut self) {
        unsafe {
            let p = TC1::ptr();
            (*p).tccr1a.write(|w| w.bits(0));
            (*p).tccr1b.write(|w| w.bits(WGM12 | CS11));
            (*p).tcnt1.write(|w| w.bits(0));
            (*p).tifr.write(|w| w.bits(OCF1A));
        }
    }

    #[inline]
    fn counter(&self) -> u16 {
        unsafe { (*TC1::ptr()).tcnt1.read().bits() }
    }

    #[inline]
    fn reset_counter(&mut self) {
        unsafe { (*TC1::ptr()).tcnt1.write(|w| w.bits(0)) }
    }

    fn arm(&mut self, compare: u16) {
        unsafe {
            let p = TC1::ptr();
            // must come after TCCR1A/B, writing those clears OCR1A
            (*p).ocr1a.write(|w| w.bits(compare));
            (*p).tifr.write(|w| w.bits(OCF1A));
            (*p).timsk.modify(|r, w| w.bits(r.bits() | OCIE1A));
        }
    }

    #[inline]
    fn set_compare(&mut self, compare: u16) {
        unsafe { (*TC1::ptr()).ocr1a.write(|w| w.bits(compare)) }
    }

    #[inline]
    fn disarm(&mut self) {
        unsafe {
            (*TC1::ptr()).timsk.modify(|r, w| w.bits(r.bits() & !OCIE1A));
        }
    }
}

/// Square wave on OC0 (PB4) for the piezo.
pub struct Tone0 {
    _tc0: TC0,
}

impl Tone0 {
    /// 16MHz / 32 = 500kHz, toggling every 80 counts gives 3.125kHz.
    const HALF_PERIOD: u8 = 80;

    pub fn new(tc0: TC0) -> Self {
        unsafe { (*TC0::ptr()).tccr0.write(|w| w.bits(0)) }
        Self { _tc0: tc0 }
    }

    pub fn start(&mut self) {
        unsafe {
            let p = TC0::ptr();
            (*p).tccr0.write(|w| w.bits(WGM01 | COM00 | CS0_DIV32));
            (*p).ocr0.write(|w| w.bits(Self::HALF_PERIOD));
        }
    }

    pub fn stop(&mut self) {
        // disconnecting OC0 as well avoids a whine from a pin left high
        unsafe { (*TC0::ptr()).tccr0.write(|w| w.bits(0)) }
    }
}
