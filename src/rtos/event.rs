//! Event slots of the scheduler arena.

/// Handle to one event slot. Handed out once by `Scheduler::new_event` and
/// kept by the driver that owns the event for the life of the program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventId(u8);

impl EventId {
    pub(crate) const fn new(index: u8) -> Self {
        Self(index)
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Whether an event is linked into the pending list, and what it will run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventState<F> {
    Unscheduled,
    Scheduled(F),
}

impl<F> EventState<F> {
    #[inline]
    pub fn is_scheduled(&self) -> bool {
        matches!(self, EventState::Scheduled(_))
    }
}

pub(crate) struct Slot<F> {
    /// Ticks after the previous pending event (or after the last counter
    /// reset for the head). Wider than a single request so a chain can
    /// reach past `u32::MAX` from the counter's time base.
    pub delay: u64,
    pub state: EventState<F>,
    pub next: Option<EventId>,
}

impl<F> Slot<F> {
    pub const fn vacant() -> Self {
        Self {
            delay: 0,
            state: EventState::Unscheduled,
            next: None,
        }
    }
}
