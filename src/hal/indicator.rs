use core::convert::Infallible;
use embedded_hal::digital::v2::OutputPin;

use super::timer::Tone0;

/// Pulse LED plus piezo click, driven as one output.
pub struct PulseIndicator<LED> {
    led: LED,
    tone: Tone0,
}

impl<LED: OutputPin<Error = Infallible>> PulseIndicator<LED> {
    pub fn new(led: LED, tone: Tone0) -> Self {
        Self { led, tone }
    }
}

impl<LED: OutputPin<Error = Infallible>> OutputPin for PulseIndicator<LED> {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.tone.start();
        self.led.set_high()
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.tone.stop();
        self.led.set_low()
    }
}
