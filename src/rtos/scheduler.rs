//! Delta-queue event scheduler on a single compare-match timer.
//!
//! Pending events form a singly linked list ordered by deadline. Each node
//! stores its delay relative to the node before it, the head's delay being
//! relative to the last time the hardware counter was cleared. A timer fire
//! therefore only ever looks at the head.
//!
//! Deadlines wider than the 16-bit counter are chained: the compare register
//! is loaded with `MAX_SLEEP_TICKS` and every fire subtracts that span from
//! the head until the remainder fits. Deadlines closer than
//! `MIN_DELAY_TICKS` are not trusted to the interrupt at all; the scheduler
//! spins and runs them inline.
//!
//! Callbacks run with interrupts disabled, from `dispatch` or from a
//! `register` call that found its new head already due. They receive the
//! scheduler itself and may register any event, themselves included.

use core::mem;

use super::critical::IrqGuard;
use super::event::{EventId, EventState, Slot};
use super::timer::TickTimer;
use super::Error;
use crate::config::{DISPATCH_LEAD_TICKS, MAX_SLEEP_TICKS, MIN_DELAY_TICKS};

/// Handler run when an event's deadline is reached.
pub type Callback<T, C, const N: usize> = fn(&mut Scheduler<T, C, N>, EventId);

pub struct Scheduler<T, C, const N: usize> {
    timer: T,
    context: C,
    slots: [Slot<Callback<T, C, N>>; N],
    allocated: usize,
    head: Option<EventId>,
    initialized: bool,
}

impl<T: TickTimer, C, const N: usize> Scheduler<T, C, N> {
    /// Create a scheduler owning `timer` and the application `context`
    /// handed to callbacks. Nothing touches the hardware until
    /// [`initialize`](Self::initialize).
    pub fn new(timer: T, context: C) -> Self {
        Self {
            timer,
            context,
            slots: core::array::from_fn(|_| Slot::vacant()),
            allocated: 0,
            head: None,
            initialized: false,
        }
    }

    /// Configure the timer. Call once before any `register`.
    pub fn initialize(&mut self) {
        let _irq = IrqGuard::acquire();
        self.timer.disarm();
        self.timer.configure();
        self.initialized = true;
    }

    /// Claim a slot from the arena.
    pub fn new_event(&mut self) -> Result<EventId, Error> {
        if self.allocated >= N || self.allocated > usize::from(u8::MAX) {
            return Err(Error::ArenaFull);
        }
        let id = EventId::new(self.allocated as u8);
        self.allocated += 1;
        Ok(id)
    }

    /// Schedule `event` to run `callback` in `delay` ticks.
    ///
    /// An event that is already pending is taken out of the list first, so
    /// this also cancels and reschedules. Safe to call from a callback,
    /// including the event's own.
    ///
    /// Deadlines served by the busy-wait run up to `DISPATCH_LEAD_TICKS`
    /// early, and the counter restarts at that point, so every event behind
    /// an inline fire moves up by the same amount. Interrupt fires are exact.
    pub fn register(&mut self, event: EventId, callback: Callback<T, C, N>, delay: u32) {
        debug_assert!(self.initialized, "register called before initialize");
        let _irq = IrqGuard::acquire();

        let mut head_changed = self.unlink(event);
        self.slots[event.index()].state = EventState::Scheduled(callback);

        // The list is measured from the last counter reset, the request from
        // now. Walk with the request moved onto the list's time base.
        let now = match self.head {
            Some(_) => u64::from(self.timer.counter()),
            None => 0,
        };
        let mut remaining = u64::from(delay) + now;
        let mut prev = None;
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let slot = &self.slots[id.index()];
            if slot.delay > remaining {
                break;
            }
            remaining -= slot.delay;
            prev = Some(id);
            cursor = slot.next;
        }

        let slot = &mut self.slots[event.index()];
        slot.delay = remaining;
        slot.next = cursor;
        if let Some(next) = cursor {
            self.slots[next.index()].delay -= remaining;
        }

        match prev {
            Some(prev) => self.slots[prev.index()].next = Some(event),
            None => {
                // New head: restart the counter so the head is relative to
                // now. Successors stay relative to the head. An overdue head
                // is never overtaken, since `remaining >= now` while its delay
                // is below `now`.
                self.head = Some(event);
                self.slots[event.index()].delay = remaining - now;
                self.timer.reset_counter();
                head_changed = true;
            }
        }

        if head_changed {
            self.program_timer();
        }
    }

    /// Compare-match handler. Runs or advances the head, then re-arms.
    pub fn dispatch(&mut self) {
        let _irq = IrqGuard::acquire();
        self.timer.disarm();
        if self.head.is_none() {
            return;
        }
        self.run_next();
        self.program_timer();
    }

    /// Take `event` out of the pending list if it is there. Returns whether
    /// it was the head.
    fn unlink(&mut self, event: EventId) -> bool {
        let slot = &mut self.slots[event.index()];
        if !slot.state.is_scheduled() {
            return false;
        }
        slot.state = EventState::Unscheduled;
        let next = slot.next.take();
        let delay = slot.delay;
        if let Some(next) = next {
            let succ = &mut self.slots[next.index()];
            succ.delay += delay;
        }

        if self.head == Some(event) {
            self.head = next;
            return true;
        }
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let slot = &mut self.slots[id.index()];
            if slot.next == Some(event) {
                slot.next = next;
                break;
            }
            cursor = slot.next;
        }
        false
    }

    /// Arm the compare interrupt for the head, or spin and run it here when
    /// it is too close for the interrupt path.
    fn program_timer(&mut self) {
        self.timer.disarm();
        while let Some(head) = self.head {
            let delay = self.slots[head.index()].delay;
            if delay >= u64::from(MAX_SLEEP_TICKS) {
                self.timer.arm(MAX_SLEEP_TICKS as u16);
                return;
            }
            // delay < MAX_SLEEP_TICKS, so the casts below are lossless
            let guard = u64::from(self.timer.counter()) + u64::from(MIN_DELAY_TICKS);
            if delay > guard {
                self.timer.arm(delay as u16);
                return;
            }
            // CTC clears the counter at OCR1A even with the interrupt off. A
            // stale compare value below the target would keep the spin from
            // ever getting there.
            self.timer.set_compare(guard.min(u64::from(u16::MAX)) as u16);
            self.timer
                .wait_until((delay as u16).saturating_sub(DISPATCH_LEAD_TICKS));
            self.run_next();
        }
    }

    fn run_next(&mut self) {
        self.timer.reset_counter();
        let Some(head) = self.head else {
            return;
        };
        let slot = &mut self.slots[head.index()];
        if slot.delay >= u64::from(MAX_SLEEP_TICKS) {
            slot.delay -= u64::from(MAX_SLEEP_TICKS);
            return;
        }
        self.head = slot.next.take();
        // Unscheduled before the call, so the callback may register it again.
        let state = mem::replace(&mut slot.state, EventState::Unscheduled);
        if let EventState::Scheduled(callback) = state {
            callback(self, head);
        }
    }

    pub fn is_scheduled(&self, event: EventId) -> bool {
        self.slots[event.index()].state.is_scheduled()
    }

    /// Ticks from the last counter reset until `event` fires.
    pub fn deadline(&self, event: EventId) -> Option<u64> {
        let mut total = 0u64;
        for (id, delay) in self.pending() {
            total += delay;
            if id == event {
                return Some(total);
            }
        }
        None
    }

    /// Pending events in firing order with their relative delays.
    pub fn pending(&self) -> Pending<'_, T, C, N> {
        Pending {
            slots: &self.slots,
            cursor: self.head,
        }
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }
}

pub struct Pending<'a, T, C, const N: usize> {
    slots: &'a [Slot<Callback<T, C, N>>; N],
    cursor: Option<EventId>,
}

impl<'a, T, C, const N: usize> Iterator for Pending<'a, T, C, N> {
    type Item = (EventId, u64);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let slot = &self.slots[id.index()];
        self.cursor = slot.next;
        Some((id, slot.delay))
    }
}
