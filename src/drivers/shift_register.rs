//! 74HC595 8-bit SIPO shift register, bit-banged over three pins.

use embedded_hal::digital::v2::OutputPin;

pub struct ShiftRegister<DS, SHCP, STCP> {
    data: DS,
    shift_clock: SHCP,
    store_clock: STCP,
}

impl<DS, SHCP, STCP, E> ShiftRegister<DS, SHCP, STCP>
where
    DS: OutputPin<Error = E>,
    SHCP: OutputPin<Error = E>,
    STCP: OutputPin<Error = E>,
{
    pub fn new(data: DS, shift_clock: SHCP, store_clock: STCP) -> Self {
        Self {
            data,
            shift_clock,
            store_clock,
        }
    }

    /// Shift `value` out MSB first and latch it onto the outputs.
    pub fn put(&mut self, value: u8) -> Result<(), E> {
        self.store_clock.set_low()?;
        let mut bit = 0x80u8;
        while bit != 0 {
            if value & bit != 0 {
                self.data.set_high()?;
            } else {
                self.data.set_low()?;
            }
            self.shift_clock.set_high()?;
            self.shift_clock.set_low()?;
            bit >>= 1;
        }
        self.store_clock.set_high()
    }

    pub fn release(self) -> (DS, SHCP, STCP) {
        (self.data, self.shift_clock, self.store_clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::pin::{Mock, State, Transaction};

    #[test]
    fn shifts_msb_first_then_latches() {
        let value = 0b1010_0001u8;
        let data_expect: Vec<_> = (0..8)
            .rev()
            .map(|b| {
                let state = if value & (1 << b) != 0 { State::High } else { State::Low };
                Transaction::set(state)
            })
            .collect();
        let clock_expect: Vec<_> = (0..8)
            .flat_map(|_| [Transaction::set(State::High), Transaction::set(State::Low)])
            .collect();
        let latch_expect = [Transaction::set(State::Low), Transaction::set(State::High)];

        let data = Mock::new(&data_expect);
        let clock = Mock::new(&clock_expect);
        let latch = Mock::new(&latch_expect);

        let mut sr = ShiftRegister::new(data, clock, latch);
        sr.put(value).unwrap();

        let (mut data, mut clock, mut latch) = sr.release();
        data.done();
        clock.done();
        latch.done();
    }
}
