use crate::gesture::NavAction;
use crate::screen::{DoorPhase, ScreenId, Viewport};
use crate::turner::TurnerKind;
use crate::view::Cue;

/// What happened inside the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum InviteEventKind {
    // Screens
    /// The active screen changed.
    ScreenChanged {
        /// The screen that lost the `active` marker.
        from: ScreenId,
        /// The screen that gained it.
        to: ScreenId,
    },
    /// A door animation phase began.
    DoorPhaseStarted {
        /// The phase now applied.
        phase: DoorPhase,
    },
    /// `open_door` was called while the door was already opening.
    DoorTriggerIgnored,

    // Sound
    /// A sound cue was handed to the audio sink.
    CuePlayed {
        /// The cue that played.
        cue: Cue,
    },
    /// A sound cue was rejected.
    CueFailed {
        /// The cue that failed.
        cue: Cue,
        /// Why playback failed.
        reason: String,
    },

    // Viewer
    /// A flipbook viewer was constructed.
    ViewerBuilt {
        /// The backend in use.
        kind: TurnerKind,
    },
    /// The existing viewer was destroyed before a rebuild.
    ViewerDestroyed,
    /// The viewer was resized to a new viewport.
    ViewerResized {
        /// The new size.
        viewport: Viewport,
    },

    // Pages
    /// The current page changed.
    PageChanged {
        /// The new 1-based page.
        page: u32,
    },
    /// A navigation request hit the first or last page.
    PageBoundary {
        /// The rejected direction.
        action: NavAction,
    },
}

/// A record of something that happened, stamped with session time.
#[derive(Debug, Clone, PartialEq)]
pub struct InviteEvent {
    /// Milliseconds since the controller started.
    pub at_ms: u64,
    /// The specific kind of event.
    pub kind: InviteEventKind,
    /// A human-readable description.
    pub description: String,
}

impl InviteEvent {
    /// Create an event at `at_ms`.
    pub fn new(at_ms: u64, kind: InviteEventKind, description: impl Into<String>) -> Self {
        Self {
            at_ms,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during a session.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<InviteEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a log holding at most `max_events` entries (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest ones past capacity.
    pub fn push(&mut self, event: InviteEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Retained events, oldest first.
    pub fn events(&self) -> &[InviteEvent] {
        &self.events
    }

    /// Number of retained events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Events matching a predicate on their kind.
    pub fn filter<'a>(
        &'a self,
        pred: impl Fn(&InviteEventKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a InviteEvent> + 'a {
        self.events.iter().filter(move |e| pred(&e.kind))
    }

    /// Every screen change, oldest first.
    pub fn screen_changes(&self) -> Vec<(u64, ScreenId)> {
        self.events
            .iter()
            .filter_map(|e| match e.kind {
                InviteEventKind::ScreenChanged { to, .. } => Some((e.at_ms, to)),
                _ => None,
            })
            .collect()
    }
}
