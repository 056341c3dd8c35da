use std::cell::Cell;
use std::rc::Rc;

/// Millisecond time source for one session.
pub trait Clock {
    /// Milliseconds since the session started.
    fn now_ms(&self) -> u64;
}

/// Manually advanced clock for tests and headless runs.
///
/// Clones share the same time, so a harness can keep one handle and give
/// another to the controller.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now: Rc<Cell<u64>>,
}

impl VirtualClock {
    /// A clock at 0 ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward to `ms`. Time never goes backwards.
    pub fn set(&self, ms: u64) {
        if ms > self.now.get() {
            self.now.set(ms);
        }
    }

    /// Move time forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for VirtualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_initial_state() {
        assert_eq!(VirtualClock::new().now_ms(), 0);
    }

    #[test]
    fn clones_share_time() {
        let clock = VirtualClock::new();
        let handle = clock.clone();
        clock.advance(800);
        handle.advance(1500);
        assert_eq!(clock.now_ms(), 2300);
    }

    #[test]
    fn set_never_rewinds() {
        let clock = VirtualClock::new();
        clock.set(2000);
        clock.set(1000);
        assert_eq!(clock.now_ms(), 2000);
    }
}
