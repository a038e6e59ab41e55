//! USART0, transmit only. Telemetry never reads.

use avr_device::atmega128a::USART0;
use core::convert::Infallible;
use embedded_hal::serial;

use crate::config::UBRR_VALUE;

// UCSR0A
const UDRE0: u8 = 1 << 5;
const TXC0: u8 = 1 << 6;
// UCSR0B
const TXEN0: u8 = 1 << 3;
// UCSR0C: 8 data bits, no parity, 1 stop bit
const UCSZ0_8BIT: u8 = 0x06;

pub struct Usart0 {
    _usart: USART0,
}

impl Usart0 {
    pub fn new(usart: USART0) -> Self {
        unsafe {
            let p = USART0::ptr();
            (*p).ubrr0h.write(|w| w.bits((UBRR_VALUE >> 8) as u8));
            (*p).ubrr0l.write(|w| w.bits(UBRR_VALUE as u8));
            (*p).ucsr0c.write(|w| w.bits(UCSZ0_8BIT));
            (*p).ucsr0b.write(|w| w.bits(TXEN0));
        }
        Self { _usart: usart }
    }
}

impl serial::Write<u8> for Usart0 {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Infallible> {
        unsafe {
            let p = USART0::ptr();
            if (*p).ucsr0a.read().bits() & UDRE0 == 0 {
                return Err(nb::Error::WouldBlock);
            }
            // writing TXC0 clears it so flush can tell when this byte is out
            (*p).ucsr0a.modify(|r, w| w.bits(r.bits() | TXC0));
            (*p).udr0.write(|w| w.bits(byte));
        }
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Infallible> {
        unsafe {
            let a = (*USART0::ptr()).ucsr0a.read().bits();
            if a & UDRE0 == 0 || a & TXC0 == 0 {
                return Err(nb::Error::WouldBlock);
            }
        }
        Ok(())
    }
}
