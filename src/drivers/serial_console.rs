use embedded_hal::serial;
use ufmt::uWrite;

/// Blocking text writer over any non-blocking serial transmitter.
pub struct SerialConsole<S> {
    serial: S,
}

impl<S: serial::Write<u8>> SerialConsole<S> {
    pub fn new(serial: S) -> Self {
        Self { serial }
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<(), S::Error> {
        nb::block!(self.serial.write(byte))
    }

    pub fn release(self) -> S {
        self.serial
    }
}

impl<S: serial::Write<u8>> uWrite for SerialConsole<S> {
    type Error = S::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes() {
            self.write_byte(byte)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::serial::{Mock, Transaction};

    #[test]
    fn writes_every_byte_in_order() {
        let expectations = [Transaction::write_many(b"ok\r\n")];
        let mut console = SerialConsole::new(Mock::new(&expectations));
        console.write_str("ok\r\n").unwrap();
        console.release().done();
    }

    #[test]
    fn formats_through_ufmt() {
        let expectations = [Transaction::write_many(b"t=42\n")];
        let mut console = SerialConsole::new(Mock::new(&expectations));
        ufmt::uwrite!(&mut console, "t={}\n", 42u16).unwrap();
        console.release().done();
    }
}
