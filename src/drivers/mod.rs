pub mod bubble_display;
pub mod geiger;
pub mod serial_console;
pub mod shift_register;
pub mod telemetry;

pub use bubble_display::{BubbleDisplay, DigitLines, DisplayError, SegmentSink};
pub use geiger::{Geiger, Mode, Report};
pub use serial_console::SerialConsole;
pub use shift_register::ShiftRegister;
pub use telemetry::write_report;
