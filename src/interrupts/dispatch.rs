//! Vector to handler lookup.
//!
//! Registration happens during boot, before interrupts are enabled. After
//! that the registry is only read, from trap context.

use crate::constants::idt::IDT_ENTRIES;
use crate::interrupts::registers::RegisterSnapshot;

/// Something that runs when its vector fires.
pub trait InterruptHandler: Sync {
    fn handle(&self, regs: &RegisterSnapshot);
}

impl<F> InterruptHandler for F
where
    F: Fn(&RegisterSnapshot) + Sync,
{
    fn handle(&self, regs: &RegisterSnapshot) {
        self(regs)
    }
}

pub struct DispatchRegistry<'a> {
    handlers: [Option<&'a dyn InterruptHandler>; IDT_ENTRIES],
}

impl<'a> DispatchRegistry<'a> {
    pub const fn new() -> Self {
        Self {
            handlers: [None; IDT_ENTRIES],
        }
    }

    /// Binds `handler` to `vector`, replacing any earlier binding.
    pub fn register(&mut self, vector: u8, handler: &'a dyn InterruptHandler) {
        if self.handlers[vector as usize].is_some() {
            log::debug!("dispatch: replacing handler for vector {}", vector);
        }
        self.handlers[vector as usize] = Some(handler);
    }

    pub fn is_registered(&self, vector: u8) -> bool {
        self.handlers[vector as usize].is_some()
    }

    /// Runs the handler bound to `vector`. Returns whether one ran.
    pub fn dispatch(&self, vector: u8, regs: &RegisterSnapshot) -> bool {
        match self.handlers[vector as usize] {
            Some(handler) => {
                handler.handle(regs);
                true
            }
            None => false,
        }
    }
}

impl Default for DispatchRegistry<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

    #[test]
    fn registered_handler_sees_snapshot() {
        let seen = AtomicU32::new(0);
        let handler = |regs: &RegisterSnapshot| seen.store(regs.error_code(), Ordering::SeqCst);
        let mut registry = DispatchRegistry::new();
        registry.register(14, &handler);

        assert!(registry.dispatch(14, &RegisterSnapshot::new(14, 0x2)));
        assert_eq!(seen.load(Ordering::SeqCst), 0x2);
    }

    #[test]
    fn unregistered_vector_is_a_no_op() {
        let registry = DispatchRegistry::new();
        assert!(!registry.is_registered(200));
        assert!(!registry.dispatch(200, &RegisterSnapshot::new(200, 0)));
    }

    #[test]
    fn last_registration_wins() {
        let first = AtomicUsize::new(0);
        let second = AtomicUsize::new(0);
        let a = |_: &RegisterSnapshot| {
            first.fetch_add(1, Ordering::SeqCst);
        };
        let b = |_: &RegisterSnapshot| {
            second.fetch_add(1, Ordering::SeqCst);
        };
        let mut registry = DispatchRegistry::new();
        registry.register(33, &a);
        registry.register(33, &b);

        registry.dispatch(33, &RegisterSnapshot::new(33, 0));

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handlers_are_per_vector() {
        let hits = AtomicUsize::new(0);
        let handler = |_: &RegisterSnapshot| {
            hits.fetch_add(1, Ordering::SeqCst);
        };
        let mut registry = DispatchRegistry::new();
        registry.register(0, &handler);
        registry.register(255, &handler);

        registry.dispatch(0, &RegisterSnapshot::new(0, 0));
        registry.dispatch(1, &RegisterSnapshot::new(1, 0));
        registry.dispatch(255, &RegisterSnapshot::new(255, 0));

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert!(registry.is_registered(255));
        assert!(!registry.is_registered(1));
    }
}
