use crate::clock::{Clock, VirtualClock};
use crate::controller::Controller;
use crate::schedule::{Task, TaskQueue};
use crate::screen::Viewport;
use crate::view::View;

/// Runs a [`Controller`] against a virtual clock.
///
/// Owns the pending timers the browser would otherwise hold and fires them
/// in due order as time is advanced.
#[derive(Debug)]
pub struct Timeline<V: View> {
    controller: Controller<V>,
    clock: VirtualClock,
    queue: TaskQueue,
    fired: Vec<(u64, Task)>,
}

impl<V: View> Timeline<V> {
    /// `clock` must be the clock the controller was built with.
    pub fn new(controller: Controller<V>, clock: VirtualClock) -> Self {
        Self {
            controller,
            clock,
            queue: TaskQueue::new(),
            fired: Vec::new(),
        }
    }

    /// Load the page at time 0.
    pub fn start(&mut self, viewport: Viewport) {
        self.act(|c| c.start(viewport));
    }

    /// Call into the controller at the current time and collect whatever it
    /// scheduled.
    pub fn act<R>(&mut self, f: impl FnOnce(&mut Controller<V>) -> R) -> R {
        let out = f(&mut self.controller);
        self.collect();
        out
    }

    fn collect(&mut self) {
        for task in self.controller.take_scheduled() {
            self.queue.push(task);
        }
    }

    /// Fire every task due at or before `ms`, then set the clock to `ms`.
    pub fn advance_to(&mut self, ms: u64) {
        while let Some(next) = self.queue.pop_due(ms) {
            self.clock.set(next.due_ms);
            self.controller.run_task(next.task);
            self.fired.push((next.due_ms, next.task));
            self.collect();
        }
        self.clock.set(ms);
    }

    /// Advance by `ms` from the current time.
    pub fn advance_by(&mut self, ms: u64) {
        let target = self.now_ms() + ms;
        self.advance_to(target);
    }

    /// Fire tasks until none are left.
    pub fn run_until_idle(&mut self) {
        while let Some(due) = self.queue.next_due() {
            self.advance_to(due.max(self.now_ms()));
        }
    }

    /// Current virtual time.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// The driven controller.
    pub fn controller(&self) -> &Controller<V> {
        &self.controller
    }

    /// Tasks fired so far with the time they fired.
    pub fn fired(&self) -> &[(u64, Task)] {
        &self.fired
    }

    /// Number of tasks not yet fired.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InviteConfig;
    use crate::headless::RecordingView;
    use crate::screen::ScreenId;

    fn timeline(width: f64) -> Timeline<RecordingView> {
        let clock = VirtualClock::new();
        let controller = Controller::new(InviteConfig::default(), RecordingView::new(13), clock.clone());
        let mut tl = Timeline::new(controller, clock);
        tl.start(Viewport::new(width, 800.0));
        tl
    }

    #[test]
    fn door_opens_at_two_seconds() {
        let mut tl = timeline(390.0);
        tl.advance_to(1999);
        assert!(!tl.controller().state().door_opening);
        tl.advance_to(2000);
        assert!(tl.controller().state().door_opening);
    }

    #[test]
    fn invitation_appears_2300ms_after_trigger() {
        let mut tl = timeline(390.0);
        tl.advance_to(4299);
        assert_eq!(tl.controller().screen(), ScreenId::Door);
        tl.advance_to(4300);
        assert_eq!(tl.controller().screen(), ScreenId::Invitation);
        assert_eq!(
            tl.controller().events().screen_changes(),
            vec![(4300, ScreenId::Invitation)]
        );
    }

    #[test]
    fn run_until_idle_drains_everything() {
        let mut tl = timeline(390.0);
        tl.run_until_idle();
        assert_eq!(tl.pending(), 0);
        let tasks: Vec<_> = tl.fired().iter().map(|(_, t)| *t).collect();
        assert_eq!(
            tasks,
            vec![
                Task::WarmFlipbook,
                Task::OpenDoor,
                Task::FinishZoom,
                Task::FinishOpening
            ]
        );
        assert_eq!(tl.now_ms(), 4300);
    }

    #[test]
    fn advance_by_is_relative() {
        let mut tl = timeline(390.0);
        tl.advance_by(1500);
        tl.advance_by(1500);
        assert_eq!(tl.now_ms(), 3000);
        assert!(tl.controller().state().door_opening);
    }
}
