//! Hardware seam between the scheduler and the 16-bit compare timer.

/// A free-running 16-bit counter that clears itself on compare match.
///
/// Only the scheduler drives this; every call happens with interrupts
/// disabled.
pub trait TickTimer {
    /// Select clear-on-compare mode and the prescaler, clear any stale
    /// compare flag and zero the counter.
    fn configure(&mut self);

    /// Ticks since the counter was last cleared.
    fn counter(&self) -> u16;

    fn reset_counter(&mut self);

    /// Load the compare register and enable the compare interrupt.
    fn arm(&mut self, compare: u16);

    /// Load the compare register only. The counter still clears there, but
    /// no interrupt is requested.
    fn set_compare(&mut self, compare: u16);

    /// Disable the compare interrupt.
    fn disarm(&mut self);

    /// Spin until the counter reaches `ticks`.
    #[inline]
    fn wait_until(&mut self, ticks: u16) {
        while self.counter() < ticks {}
    }
}

#[cfg(test)]
pub(crate) mod sim {
    use super::TickTimer;

    /// Timer1 stand-in. `tick()` advances one count and reports whether the
    /// compare interrupt should be taken.
    ///
    /// Counts like the hardware in CTC mode: `0..=compare`, then back to
    /// zero, interrupt enabled or not. `compare` starts at the OCR1A reset
    /// value, so a fresh timer holds the counter at zero.
    pub struct SimTimer {
        pub counter: u16,
        pub compare: u16,
        pub armed: bool,
        pub configured: bool,
        /// Wall clock in ticks, never reset.
        pub elapsed: u64,
        /// Every value written through `arm`.
        pub arm_history: Vec<u16>,
        pub busy_waits: u32,
    }

    impl SimTimer {
        pub fn new() -> Self {
            Self {
                counter: 0,
                compare: 0,
                armed: false,
                configured: false,
                elapsed: 0,
                arm_history: Vec::new(),
                busy_waits: 0,
            }
        }

        pub fn tick(&mut self) -> bool {
            self.elapsed += 1;
            if self.counter == self.compare {
                self.counter = 0;
            } else {
                self.counter = self.counter.wrapping_add(1);
            }
            self.armed && self.counter == self.compare
        }

        pub fn ever_armed(&self) -> bool {
            !self.arm_history.is_empty()
        }
    }

    impl TickTimer for SimTimer {
        fn configure(&mut self) {
            self.configured = true;
            self.counter = 0;
        }

        fn counter(&self) -> u16 {
            self.counter
        }

        fn reset_counter(&mut self) {
            self.counter = 0;
        }

        fn arm(&mut self, compare: u16) {
            self.compare = compare;
            self.armed = true;
            self.arm_history.push(compare);
        }

        fn set_compare(&mut self, compare: u16) {
            self.compare = compare;
        }

        fn disarm(&mut self) {
            self.armed = false;
        }

        /// Spins tick by tick, so a compare value below `ticks` wraps the
        /// counter exactly as it would on the chip.
        fn wait_until(&mut self, ticks: u16) {
            self.busy_waits += 1;
            let mut spun = 0u32;
            while self.counter < ticks {
                self.tick();
                spun += 1;
                assert!(
                    spun <= u32::from(u16::MAX),
                    "busy wait for {ticks} never ends: counter clears at {}",
                    self.compare
                );
            }
        }
    }
}
