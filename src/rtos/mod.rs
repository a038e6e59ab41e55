//! Event scheduler multiplexing delayed callbacks onto Timer1

pub mod critical;
pub mod event;
pub mod scheduler;
pub mod timer;

pub use critical::IrqGuard;
pub use event::{EventId, EventState};
pub use scheduler::{Callback, Pending, Scheduler};
pub use timer::TickTimer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Every slot of the event arena is already handed out.
    ArenaFull,
}
