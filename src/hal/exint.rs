use avr_device::atmega128a::EXINT;

// EICRA
const ISC01: u8 = 1 << 1;
// EIMSK / EIFR
const INT0: u8 = 1 << 0;
const INTF0: u8 = 1 << 0;

/// INT0 on the falling edge of the GM tube output.
pub fn enable_int0_falling(_exint: &EXINT) {
    unsafe {
        let p = EXINT::ptr();
        (*p).eicra.modify(|r, w| w.bits((r.bits() & !0x03) | ISC01));
        (*p).eifr.write(|w| w.bits(INTF0));
        (*p).eimsk.modify(|r, w| w.bits(r.bits() | INT0));
    }
}
