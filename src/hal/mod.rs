//! ATmega128 peripherals used by the firmware.

pub mod exint;
pub mod gpio;
pub mod indicator;
pub mod power;
pub mod timer;
pub mod uart;

pub use gpio::board;
pub use gpio::{Input, Output, Pin};
pub use indicator::PulseIndicator;
pub use power::Power;
pub use timer::{Timer1, Tone0};
pub use uart::Usart0;
