//! QDSP-6064 four digit bubble display, multiplexed one digit at a time.
//!
//! Segments a..g are bits 0..6 and the decimal point bit 7; they go out
//! through the shift register. The four cathodes are driven active low,
//! line 0 being the rightmost digit.

use embedded_hal::digital::v2::OutputPin;

use super::shift_register::ShiftRegister;

const SA: u8 = 1;
const SB: u8 = 2;
const SC: u8 = 4;
const SD: u8 = 8;
const SE: u8 = 16;
const SF: u8 = 32;
const SG: u8 = 64;
pub const DP: u8 = 128;

const DIGIT_SEGMENTS: [u8; 10] = [
    SA | SB | SC | SD | SE | SF,
    SB | SC,
    SA | SB | SD | SE | SG,
    SA | SB | SC | SD | SG,
    SB | SC | SF | SG,
    SA | SC | SD | SF | SG,
    SA | SC | SD | SE | SF | SG,
    SA | SB | SC,
    SA | SB | SC | SD | SE | SF | SG,
    SA | SB | SC | SD | SF | SG,
];

/// Shown for anything that is not a decimal digit.
pub const ERROR_GLYPH: u8 = SA | SD | SG;

pub const DIGIT_COUNT: usize = 4;

pub fn segments_of(value: u8) -> u8 {
    DIGIT_SEGMENTS
        .get(usize::from(value))
        .copied()
        .unwrap_or(ERROR_GLYPH)
}

/// Where segment patterns go.
pub trait SegmentSink {
    type Error;
    fn write_segments(&mut self, segments: u8) -> Result<(), Self::Error>;
}

impl<DS, SHCP, STCP, E> SegmentSink for ShiftRegister<DS, SHCP, STCP>
where
    DS: OutputPin<Error = E>,
    SHCP: OutputPin<Error = E>,
    STCP: OutputPin<Error = E>,
{
    type Error = E;

    fn write_segments(&mut self, segments: u8) -> Result<(), E> {
        self.put(segments)
    }
}

/// The four digit select lines. Bit n of `mask` drives line n.
pub trait DigitLines {
    type Error;
    fn write_lines(&mut self, mask: u8) -> Result<(), Self::Error>;
}

impl<L0, L1, L2, L3, E> DigitLines for (L0, L1, L2, L3)
where
    L0: OutputPin<Error = E>,
    L1: OutputPin<Error = E>,
    L2: OutputPin<Error = E>,
    L3: OutputPin<Error = E>,
{
    type Error = E;

    fn write_lines(&mut self, mask: u8) -> Result<(), E> {
        set_line(&mut self.0, mask & 0x01 != 0)?;
        set_line(&mut self.1, mask & 0x02 != 0)?;
        set_line(&mut self.2, mask & 0x04 != 0)?;
        set_line(&mut self.3, mask & 0x08 != 0)
    }
}

fn set_line<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), P::Error> {
    if high {
        pin.set_high()
    } else {
        pin.set_low()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum DisplayError<D, S> {
    Digits(D),
    Segments(S),
}

pub struct BubbleDisplay<DIG, SEG> {
    lines: DIG,
    segments: SEG,
    /// Least significant digit first
    digits: [u8; DIGIT_COUNT],
    decimal_point: Option<usize>,
    /// Next digit to light
    dx: usize,
}

impl<DIG: DigitLines, SEG: SegmentSink> BubbleDisplay<DIG, SEG> {
    pub fn new(lines: DIG, segments: SEG) -> Self {
        Self {
            lines,
            segments,
            digits: [0; DIGIT_COUNT],
            decimal_point: None,
            dx: 0,
        }
    }

    /// Show `value` with `decimals` digits after the point. Digits above the
    /// fourth are dropped.
    pub fn set_value(&mut self, value: u16, decimals: u8) {
        let mut value = value;
        for digit in self.digits.iter_mut() {
            *digit = (value % 10) as u8;
            value /= 10;
        }
        let decimals = usize::from(decimals);
        self.decimal_point = (decimals > 0 && decimals < DIGIT_COUNT).then_some(decimals);
    }

    pub fn digits(&self) -> [u8; DIGIT_COUNT] {
        self.digits
    }

    /// Light the next digit. Called every `DIGIT_REFRESH_US`.
    pub fn refresh(&mut self) -> Result<(), DisplayError<DIG::Error, SEG::Error>> {
        let dx = self.dx;
        self.show(dx)?;
        self.dx = (dx + 1) % DIGIT_COUNT;
        Ok(())
    }

    fn show(&mut self, dx: usize) -> Result<(), DisplayError<DIG::Error, SEG::Error>> {
        // Blank first so the previous digit's segments don't ghost onto this one
        self.segments
            .write_segments(0)
            .map_err(DisplayError::Segments)?;
        self.lines
            .write_lines(0x0f ^ (1 << (DIGIT_COUNT - 1 - dx)))
            .map_err(DisplayError::Digits)?;
        let mut segments = segments_of(self.digits[dx]);
        if self.decimal_point == Some(dx) {
            segments |= DP;
        }
        self.segments
            .write_segments(segments)
            .map_err(DisplayError::Segments)
    }

    pub fn release(self) -> (DIG, SEG) {
        (self.lines, self.segments)
    }
}
