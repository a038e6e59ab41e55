//! Configuration constants for the Geiger counter firmware

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// Timer1 clock prescaler (CS11 only)
pub const TIMER1_PRESCALER: u32 = 8;

/// Timer1 tick rate, 2MHz or 0.5us per tick
pub const TIMER1_FREQ_HZ: u32 = CPU_FREQ_HZ / TIMER1_PRESCALER;

/// Deadlines closer than this are served by spinning instead of the compare interrupt.
pub const MIN_DELAY_TICKS: u32 = 64;

/// Largest span programmed into OCR1A at once. Longer delays are chained.
pub const MAX_SLEEP_TICKS: u32 = 0xFFFF - MIN_DELAY_TICKS;

/// Cycles spent between leaving the busy-wait and entering the callback.
pub const DISPATCH_LEAD_TICKS: u16 = (32 / TIMER1_PRESCALER) as u16;

/// Number of event slots in the scheduler arena
pub const MAX_EVENTS: usize = 4;

/// UART baud rate
pub const UART_BAUD: u32 = 9600;

/// USART0 baud rate register value for `UART_BAUD`
pub const UBRR_VALUE: u16 = (CPU_FREQ_HZ / (16 * UART_BAUD) - 1) as u16;

/// Time each display digit stays lit
pub const DIGIT_REFRESH_US: u32 = 1_000;

/// Telemetry and averaging period
pub const REPORT_PERIOD_US: u32 = 1_000_000;

/// Length of the click and flash on each GM pulse
pub const BIP_US: u32 = 10_000;

/// Counter demo increment period
pub const COUNTER_DEMO_US: u32 = 100_000;

/// Seconds of samples kept for SLOW averaging
pub const LONG_PERIOD: usize = 60;

/// Seconds of samples used for FAST averaging
pub const SHORT_PERIOD: usize = 5;

/// CPM threshold for fast averaging mode
pub const FAST_THRESHOLD_CPM: u32 = 1000;

/// CPM to uSv/hr conversion factor (x10,000 to avoid float)
pub const SCALE_FACTOR: u32 = 57;

/// Convert microseconds to Timer1 ticks.
///
/// The product goes through 64 bits so a full second (or more) does not
/// overflow before the division.
pub const fn us_to_ticks(us: u32) -> u32 {
    ((us as u64 * TIMER1_FREQ_HZ as u64) / 1_000_000) as u32
}
