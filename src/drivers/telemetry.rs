//! CSV report line sent once per second:
//!
//! ```text
//! cps,cpm,dose_integer.dose_fraction,mode_letter\n
//! ```
//!
//! The dose is uSv/hr with four decimals, the mode one of `S`, `F`, `I`.

use ufmt::{uWrite, uwrite};

use super::geiger::Report;

pub fn write_report<W: uWrite>(w: &mut W, report: &Report) -> Result<(), W::Error> {
    let dose = report.dose_scaled();
    uwrite!(w, "{},{},{}.", report.cps, report.cpm, dose / 10_000)?;
    // ufmt has no width specifier
    let fraction = dose % 10_000;
    let mut div = 1_000;
    while div > 0 {
        w.write_char(char::from(b'0' + ((fraction / div) % 10) as u8))?;
        div /= 10;
    }
    w.write_char(',')?;
    w.write_char(report.mode.letter())?;
    w.write_char('\n')
}
