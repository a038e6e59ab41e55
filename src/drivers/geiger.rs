//! GM tube pulse counting and running averages.
//!
//! One sample per second goes into a 60 second ring buffer. The reported
//! CPM is the full-window sum (SLOW), or the last five seconds scaled to a
//! minute when that crosses the fast threshold (FAST). Samples are stored
//! as bytes; a second with 255 or more counts saturates its slot, and while
//! a saturated sample is in the window the averages can't be trusted, so the
//! current second times 60 is reported instead (INST).

use core::mem;

use crate::config::{FAST_THRESHOLD_CPM, LONG_PERIOD, SCALE_FACTOR, SHORT_PERIOD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Slow,
    Fast,
    Instant,
}

impl Mode {
    pub fn letter(self) -> char {
        match self {
            Mode::Slow => 'S',
            Mode::Fast => 'F',
            Mode::Instant => 'I',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub cps: u16,
    pub cpm: u32,
    pub mode: Mode,
}

impl Report {
    /// uSv/hr times 10,000
    pub fn dose_scaled(&self) -> u32 {
        self.cpm.saturating_mul(SCALE_FACTOR)
    }

    /// uSv/hr times 1000 for the four digit display, i.e. cpm * 5.7.
    pub fn display_value(&self) -> u16 {
        let milli = (u64::from(self.cpm) * 1459) >> 8;
        milli.min(9999) as u16
    }
}

pub struct Geiger {
    /// Pulses in the current second
    cps: u16,
    samples: [u8; LONG_PERIOD],
    idx: usize,
}

impl Geiger {
    pub const fn new() -> Self {
        Self {
            cps: 0,
            samples: [0; LONG_PERIOD],
            idx: 0,
        }
    }

    /// Count one GM pulse. Caps at `u16::MAX` rather than wrapping.
    #[inline]
    pub fn pulse(&mut self) {
        self.cps = self.cps.saturating_add(1);
    }

    pub fn pending_counts(&self) -> u16 {
        self.cps
    }

    /// Close the current second and compute the report.
    pub fn sample(&mut self) -> Report {
        let cps = mem::take(&mut self.cps);
        self.samples[self.idx] = cps.min(u16::from(u8::MAX)) as u8;
        self.idx = (self.idx + 1) % LONG_PERIOD;

        let saturated = self.samples.iter().any(|&s| s == u8::MAX);
        if saturated {
            return Report {
                cps,
                cpm: u32::from(cps) * 60,
                mode: Mode::Instant,
            };
        }

        let slow: u32 = self.samples.iter().map(|&s| u32::from(s)).sum();
        let fast: u32 = (1..=SHORT_PERIOD)
            .map(|back| u32::from(self.samples[(self.idx + LONG_PERIOD - back) % LONG_PERIOD]))
            .sum::<u32>()
            * (LONG_PERIOD / SHORT_PERIOD) as u32;

        if fast > FAST_THRESHOLD_CPM {
            Report {
                cps,
                cpm: fast,
                mode: Mode::Fast,
            }
        } else {
            Report {
                cps,
                cpm: slow,
                mode: Mode::Slow,
            }
        }
    }
}

impl Default for Geiger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(g: &mut Geiger, pulses: u16) -> Report {
        for _ in 0..pulses {
            g.pulse();
        }
        g.sample()
    }

    #[test]
    fn slow_average_sums_the_minute() {
        let mut g = Geiger::new();
        let mut last = None;
        for _ in 0..LONG_PERIOD {
            last = Some(feed(&mut g, 1));
        }
        let r = last.unwrap();
        assert_eq!(r.mode, Mode::Slow);
        assert_eq!(r.cpm, 60);
        assert_eq!(r.cps, 1);

        // the oldest sample rolls out
        let r = feed(&mut g, 0);
        assert_eq!(r.cpm, 59);
    }

    #[test]
    fn burst_switches_to_fast() {
        let mut g = Geiger::new();
        for _ in 0..SHORT_PERIOD {
            feed(&mut g, 20);
        }
        let r = feed(&mut g, 20);
        assert_eq!(r.mode, Mode::Fast);
        assert_eq!(r.cpm, 20 * 5 * 12);
    }

    #[test]
    fn just_under_threshold_stays_slow() {
        let mut g = Geiger::new();
        // 5 * 16 * 12 = 960 <= 1000
        let mut r = feed(&mut g, 16);
        for _ in 1..SHORT_PERIOD {
            r = feed(&mut g, 16);
        }
        assert_eq!(r.mode, Mode::Slow);
        assert_eq!(r.cpm, 80);
    }

    #[test]
    fn overflow_reports_instant_until_it_ages_out() {
        let mut g = Geiger::new();
        let r = feed(&mut g, 300);
        assert_eq!(r.mode, Mode::Instant);
        assert_eq!(r.cpm, 300 * 60);

        let r = feed(&mut g, 2);
        assert_eq!(r.mode, Mode::Instant);
        assert_eq!(r.cpm, 120);

        for _ in 0..LONG_PERIOD - 2 {
            feed(&mut g, 0);
        }
        let r = feed(&mut g, 0);
        assert_ne!(r.mode, Mode::Instant);
    }

    #[test]
    fn pulse_counter_saturates() {
        let mut g = Geiger::new();
        g.cps = u16::MAX - 1;
        g.pulse();
        g.pulse();
        assert_eq!(g.pending_counts(), u16::MAX);
        let r = g.sample();
        assert_eq!(r.cps, u16::MAX);
        assert_eq!(r.mode, Mode::Instant);
        assert_eq!(g.pending_counts(), 0);
    }

    #[test]
    fn dose_conversions() {
        let r = Report {
            cps: 0,
            cpm: 1000,
            mode: Mode::Slow,
        };
        assert_eq!(r.dose_scaled(), 57_000);
        assert_eq!(r.display_value(), 5699);

        let hot = Report {
            cps: u16::MAX,
            cpm: u32::from(u16::MAX) * 60,
            mode: Mode::Instant,
        };
        assert_eq!(hot.display_value(), 9999);
    }

    #[test]
    fn mode_letters() {
        assert_eq!(Mode::Slow.letter(), 'S');
        assert_eq!(Mode::Fast.letter(), 'F');
        assert_eq!(Mode::Instant.letter(), 'I');
    }
}
