use avr_device::atmega128a::CPU;

// MCUCR
const SE: u8 = 1 << 5;
const SM_MASK: u8 = 0x1C;

/// Idle sleep: the CPU stops, timers and external interrupts keep running.
pub struct Power {
    _cpu: CPU,
}

impl Power {
    pub fn new(cpu: CPU) -> Self {
        Self { _cpu: cpu }
    }

    /// Sleep until the next interrupt.
    #[inline]
    pub fn idle(&mut self) {
        unsafe {
            let p = CPU::ptr();
            (*p).mcucr.modify(|r, w| w.bits((r.bits() & !SM_MASK) | SE));
        }
        avr_device::asm::sleep();
        unsafe {
            (*CPU::ptr()).mcucr.modify(|r, w| w.bits(r.bits() & !SE));
        }
    }
}
