//! Leveled diagnostic lines on the serial console.
//!
//! Telemetry owns the serial line in normal builds, so the logger is silent
//! unless the `debug` feature raises its level.

use ufmt::{uWrite, uwrite};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Off = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Off => "",
            Level::Error => "[ERR] ",
            Level::Warn => "[WRN] ",
            Level::Info => "[INF] ",
            Level::Debug => "[DBG] ",
        }
    }
}

#[cfg(feature = "debug")]
pub const DEFAULT_LEVEL: Level = Level::Debug;
#[cfg(not(feature = "debug"))]
pub const DEFAULT_LEVEL: Level = Level::Off;

#[derive(Clone, Copy)]
pub struct Logger {
    max_level: Level,
}

impl Logger {
    pub const fn new(max_level: Level) -> Self {
        Self { max_level }
    }

    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level != Level::Off && level <= self.max_level
    }

    /// Write `"[LVL] msg: value\r\n"` if `level` passes the filter.
    pub fn log<W: uWrite>(&self, w: &mut W, level: Level, msg: &str, value: u32) -> Result<(), W::Error> {
        if !self.enabled(level) {
            return Ok(());
        }
        w.write_str(level.tag())?;
        uwrite!(w, "{}: {}\r\n", msg, value)
    }

    pub fn warn<W: uWrite>(&self, w: &mut W, msg: &str, value: u32) -> Result<(), W::Error> {
        self.log(w, Level::Warn, msg, value)
    }

    pub fn info<W: uWrite>(&self, w: &mut W, msg: &str, value: u32) -> Result<(), W::Error> {
        self.log(w, Level::Info, msg, value)
    }

    pub fn debug<W: uWrite>(&self, w: &mut W, msg: &str, value: u32) -> Result<(), W::Error> {
        self.log(w, Level::Debug, msg, value)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(DEFAULT_LEVEL)
    }
}
