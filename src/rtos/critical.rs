//! Interrupt-safe critical section guard.
//!
//! `IrqGuard` clears the global interrupt flag when acquired and puts back
//! whatever state it found when dropped. Nesting is therefore safe: a guard
//! taken inside the timer ISR (where the flag is already clear) leaves it
//! clear, one taken from `main` re-enables on the way out.

use core::marker::PhantomData;

pub struct IrqGuard {
    saved: imp::Saved,
    // SREG is per core; the guard must not leave the context that took it.
    _not_send: PhantomData<*const ()>,
}

impl IrqGuard {
    #[inline(always)]
    pub fn acquire() -> Self {
        Self {
            saved: imp::disable_save(),
            _not_send: PhantomData,
        }
    }
}

impl Drop for IrqGuard {
    #[inline(always)]
    fn drop(&mut self) {
        unsafe { imp::restore(self.saved) }
    }
}

/// Whether interrupts are currently enabled.
#[inline]
pub fn interrupts_enabled() -> bool {
    imp::is_enabled()
}

#[cfg(target_arch = "avr")]
mod imp {
    pub type Saved = u8;

    #[inline(always)]
    pub fn disable_save() -> Saved {
        avr_device::interrupt::disable_save()
    }

    #[inline(always)]
    pub unsafe fn restore(saved: Saved) {
        avr_device::interrupt::restore(saved)
    }

    #[inline(always)]
    pub fn is_enabled() -> bool {
        avr_device::interrupt::is_enabled()
    }
}

// Host builds model SREG.I with a flag. Tests get one per thread so they can
// run in parallel.
#[cfg(all(not(target_arch = "avr"), test))]
mod imp {
    use std::cell::Cell;

    pub type Saved = bool;

    std::thread_local! {
        static ENABLED: Cell<bool> = Cell::new(true);
    }

    pub fn disable_save() -> Saved {
        ENABLED.with(|e| e.replace(false))
    }

    pub unsafe fn restore(saved: Saved) {
        ENABLED.with(|e| e.set(saved))
    }

    pub fn is_enabled() -> bool {
        ENABLED.with(|e| e.get())
    }
}

#[cfg(all(not(target_arch = "avr"), not(test)))]
mod imp {
    use core::sync::atomic::{AtomicBool, Ordering};

    pub type Saved = bool;

    static ENABLED: AtomicBool = AtomicBool::new(true);

    pub fn disable_save() -> Saved {
        ENABLED.swap(false, Ordering::SeqCst)
    }

    pub unsafe fn restore(saved: Saved) {
        ENABLED.store(saved, Ordering::SeqCst)
    }

    pub fn is_enabled() -> bool {
        ENABLED.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restores_enabled_state() {
        assert!(interrupts_enabled());
        {
            let _irq = IrqGuard::acquire();
            assert!(!interrupts_enabled());
        }
        assert!(interrupts_enabled());
    }

    #[test]
    fn nested_guard_keeps_outer_section() {
        let outer = IrqGuard::acquire();
        {
            let _inner = IrqGuard::acquire();
            assert!(!interrupts_enabled());
        }
        // inner drop must not re-enable behind the outer guard's back
        assert!(!interrupts_enabled());
        drop(outer);
        assert!(interrupts_enabled());
    }
}
