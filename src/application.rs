//! Application layer: the events that drive the display and the counter.
//!
//! Everything here runs as scheduler callbacks, so with interrupts disabled.
//! `App` is the scheduler context; each callback reaches it through
//! `Scheduler::context_mut` and re-registers its own event to stay periodic.

use embedded_hal::digital::v2::OutputPin;
use ufmt::uWrite;

use crate::config::{
    us_to_ticks, BIP_US, COUNTER_DEMO_US, DIGIT_REFRESH_US, MAX_EVENTS, REPORT_PERIOD_US,
    TIMER1_FREQ_HZ,
};
use crate::drivers::bubble_display::{BubbleDisplay, DigitLines, SegmentSink};
use crate::drivers::geiger::{Geiger, Mode, Report};
use crate::drivers::telemetry::write_report;
use crate::logger::Logger;
use crate::rtos::{self, EventId, Scheduler, TickTimer};

/// The hardware the application talks to.
pub trait Board {
    type Digits: DigitLines;
    type Segments: SegmentSink;
    type Serial: uWrite;
    /// Pulse LED and piezo
    type Indicator: OutputPin;
}

pub type AppScheduler<T, B> = Scheduler<T, App<B>, MAX_EVENTS>;

pub struct App<B: Board> {
    pub display: BubbleDisplay<B::Digits, B::Segments>,
    pub geiger: Geiger,
    pub serial: B::Serial,
    pub indicator: B::Indicator,
    pub logger: Logger,
    last_report: Option<Report>,
    bip_stop: Option<EventId>,
    counter: u16,
}

impl<B: Board> App<B> {
    pub fn new(
        display: BubbleDisplay<B::Digits, B::Segments>,
        serial: B::Serial,
        indicator: B::Indicator,
        logger: Logger,
    ) -> Self {
        Self {
            display,
            geiger: Geiger::new(),
            serial,
            indicator,
            logger,
            last_report: None,
            bip_stop: None,
            counter: 0,
        }
    }

    pub fn last_report(&self) -> Option<Report> {
        self.last_report
    }
}

/// Geiger build: multiplex the display, report once per second, click on
/// every pulse.
pub fn start_geiger<T: TickTimer, B: Board>(s: &mut AppScheduler<T, B>) -> Result<(), rtos::Error> {
    let refresh = s.new_event()?;
    let report = s.new_event()?;
    let bip = s.new_event()?;

    let app = s.context_mut();
    app.bip_stop = Some(bip);
    app.logger
        .info(&mut app.serial, "timer hz", TIMER1_FREQ_HZ)
        .ok();

    s.register(refresh, refresh_digit::<T, B>, 0);
    s.register(report, every_second::<T, B>, us_to_ticks(REPORT_PERIOD_US));
    Ok(())
}

/// Display-only build: count up on the display ten times a second.
pub fn start_counter<T: TickTimer, B: Board>(s: &mut AppScheduler<T, B>) -> Result<(), rtos::Error> {
    let refresh = s.new_event()?;
    let count = s.new_event()?;
    s.register(refresh, refresh_digit::<T, B>, 0);
    s.register(count, count_up::<T, B>, 0);
    Ok(())
}

/// GM pulse, from INT0.
pub fn pulse<T: TickTimer, B: Board>(s: &mut AppScheduler<T, B>) {
    let app = s.context_mut();
    app.geiger.pulse();
    app.indicator.set_high().ok();
    if let Some(bip) = app.bip_stop {
        // 10ms gives a nice short flash and 'click' on the piezo
        s.register(bip, bip_stop::<T, B>, us_to_ticks(BIP_US));
    }
}

fn refresh_digit<T: TickTimer, B: Board>(s: &mut AppScheduler<T, B>, id: EventId) {
    s.context_mut().display.refresh().ok();
    s.register(id, refresh_digit::<T, B>, us_to_ticks(DIGIT_REFRESH_US));
}

fn every_second<T: TickTimer, B: Board>(s: &mut AppScheduler<T, B>, id: EventId) {
    let app = s.context_mut();
    let report = app.geiger.sample();
    app.display.set_value(report.display_value(), 3);
    write_report(&mut app.serial, &report).ok();

    let previous = app.last_report.map(|r| r.mode);
    if previous != Some(report.mode) {
        if report.mode == Mode::Instant {
            app.logger
                .warn(&mut app.serial, "cps over range", u32::from(report.cps))
                .ok();
        } else {
            app.logger
                .debug(&mut app.serial, "mode", u32::from(report.mode.letter()))
                .ok();
        }
    }
    app.last_report = Some(report);

    s.register(id, every_second::<T, B>, us_to_ticks(REPORT_PERIOD_US));
}

fn bip_stop<T: TickTimer, B: Board>(s: &mut AppScheduler<T, B>, _id: EventId) {
    s.context_mut().indicator.set_low().ok();
}

fn count_up<T: TickTimer, B: Board>(s: &mut AppScheduler<T, B>, id: EventId) {
    let app = s.context_mut();
    app.display.set_value(app.counter, 0);
    app.counter = (app.counter + 1) % 10_000;
    s.register(id, count_up::<T, B>, us_to_ticks(COUNTER_DEMO_US));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::Level;
    use crate::rtos::timer::sim::SimTimer;
    use core::convert::Infallible;

    #[derive(Default)]
    struct Lines(u32);

    impl DigitLines for Lines {
        type Error = Infallible;
        fn write_lines(&mut self, _mask: u8) -> Result<(), Infallible> {
            self.0 += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct Segments;

    impl SegmentSink for Segments {
        type Error = Infallible;
        fn write_segments(&mut self, _segments: u8) -> Result<(), Infallible> {
            Ok(())
        }
    }

    #[derive(Default)]
    struct Text(String);

    impl uWrite for Text {
        type Error = Infallible;
        fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
            self.0.push_str(s);
            Ok(())
        }
    }

    #[derive(Default)]
    struct Led(bool);

    impl OutputPin for Led {
        type Error = Infallible;
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.0 = false;
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.0 = true;
            Ok(())
        }
    }

    struct TestBoard;

    impl Board for TestBoard {
        type Digits = Lines;
        type Segments = Segments;
        type Serial = Text;
        type Indicator = Led;
    }

    type Sched = AppScheduler<SimTimer, TestBoard>;

    fn scheduler(level: Level) -> Sched {
        let display = BubbleDisplay::new(Lines::default(), Segments);
        let app: App<TestBoard> =
            App::new(display, Text::default(), Led::default(), Logger::new(level));
        let mut s = Sched::new(SimTimer::new(), app);
        s.initialize();
        s
    }

    fn run_until(s: &mut Sched, end: u64) {
        while s.timer().elapsed < end {
            if s.timer_mut().tick() {
                s.dispatch();
            }
        }
    }

    fn refreshes(s: &mut Sched) -> u32 {
        // every refresh selects a digit exactly once
        let display = core::mem::replace(
            &mut s.context_mut().display,
            BubbleDisplay::new(Lines::default(), Segments),
        );
        let (lines, _) = display.release();
        lines.0
    }

    #[test]
    fn geiger_reports_once_per_second() {
        let mut s = scheduler(Level::Off);
        start_geiger(&mut s).unwrap();

        run_until(&mut s, 1_000);
        for _ in 0..5 {
            pulse(&mut s);
        }
        run_until(&mut s, 3 * 2_000_000 + 1);

        assert_eq!(
            s.context().serial.0,
            "5,5,0.0285,S\n0,5,0.0285,S\n0,5,0.0285,S\n"
        );
        assert_eq!(s.context().display.digits(), [8, 2, 0, 0]);
        assert_eq!(s.pending().count(), 2);
    }

    #[test]
    fn display_is_refreshed_every_millisecond() {
        let mut s = scheduler(Level::Off);
        start_geiger(&mut s).unwrap();
        run_until(&mut s, 2_000_000);
        // one inline refresh at start, then one per 2000 ticks
        assert_eq!(refreshes(&mut s), 1 + 1_000);
    }

    #[test]
    fn pulse_flashes_the_indicator_for_ten_milliseconds() {
        let mut s = scheduler(Level::Off);
        start_geiger(&mut s).unwrap();
        run_until(&mut s, 1_000);
        pulse(&mut s);
        assert!(s.context().indicator.0);

        run_until(&mut s, 1_000 + 19_999);
        assert!(s.context().indicator.0);
        run_until(&mut s, 1_000 + 20_000);
        assert!(!s.context().indicator.0);

        // another pulse restarts the flash rather than stacking events
        pulse(&mut s);
        pulse(&mut s);
        assert_eq!(s.pending().count(), 3);
    }

    #[test]
    fn overload_is_logged_once() {
        let mut s = scheduler(Level::Warn);
        start_geiger(&mut s).unwrap();
        for _ in 0..300 {
            s.context_mut().geiger.pulse();
        }
        run_until(&mut s, 2_000_000);
        for _ in 0..300 {
            s.context_mut().geiger.pulse();
        }
        run_until(&mut s, 4_000_000);
        // the start-up info line is below the filter
        assert_eq!(
            s.context().serial.0,
            "300,18000,102.6000,I\n[WRN] cps over range: 300\r\n300,18000,102.6000,I\n"
        );
        assert_eq!(s.context().last_report().unwrap().mode, Mode::Instant);
    }

    #[test]
    fn counter_demo_counts_every_100ms() {
        let mut s = scheduler(Level::Off);
        start_counter(&mut s).unwrap();
        assert_eq!(s.context().display.digits(), [0, 0, 0, 0]);
        run_until(&mut s, 2_000_000);
        assert_eq!(s.context().display.digits(), [0, 1, 0, 0]);
    }

    #[test]
    fn counter_wraps_at_four_digits() {
        let mut s = scheduler(Level::Off);
        s.context_mut().counter = 9_999;
        start_counter(&mut s).unwrap();
        assert_eq!(s.context().display.digits(), [9, 9, 9, 9]);
        run_until(&mut s, 200_000);
        assert_eq!(s.context().display.digits(), [0, 0, 0, 0]);
    }
}
