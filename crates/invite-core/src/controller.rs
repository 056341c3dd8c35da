//! The screen controller: owns session state and drives the view.

use crate::clock::Clock;
use crate::config::InviteConfig;
use crate::error::{InviteError, InviteResult};
use crate::event::{EventLog, InviteEvent, InviteEventKind};
use crate::gesture::{DoubleTapGuard, Key, NavAction, Point, SwipeTracker};
use crate::page::PageCounter;
use crate::schedule::{ScheduledTask, Task};
use crate::screen::{DoorPhase, PageMarker, ScreenId, Viewport};
use crate::turner::{ManualTurner, NoLibrary, PageTurner, TurnEvent, TurnerFactory, TurnerKind};
use crate::view::{AudioSink, Cue, Silent, View};

/// Mutable session state. Everything else in the controller is wiring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    /// The one screen carrying the `active` marker.
    pub screen: ScreenId,
    /// Position in the flipbook.
    pub pages: PageCounter,
    /// Set on the first door trigger and never cleared.
    pub door_opening: bool,
}

/// Drives the door, invitation, and flipbook screens.
///
/// The controller never waits. Delayed steps are queued as
/// [`ScheduledTask`]s; the host drains them with
/// [`take_scheduled`](Self::take_scheduled) and calls
/// [`run_task`](Self::run_task) when each is due. Scheduled tasks are never
/// cancelled.
pub struct Controller<V: View> {
    config: InviteConfig,
    state: AppState,
    view: V,
    audio: Box<dyn AudioSink>,
    factory: Box<dyn TurnerFactory>,
    turner: Option<Box<dyn PageTurner>>,
    clock: Box<dyn Clock>,
    viewport: Viewport,
    swipe: SwipeTracker,
    taps: DoubleTapGuard,
    outbox: Vec<ScheduledTask>,
    events: EventLog,
}

impl<V: View> std::fmt::Debug for Controller<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.state)
            .field("viewport", &self.viewport)
            .field("viewer", &self.turner_kind())
            .field("scheduled", &self.outbox.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl<V: View> Controller<V> {
    /// Create a controller showing the door screen, with no sound and no
    /// turn library. The config is expected to be validated.
    pub fn new(config: InviteConfig, view: V, clock: impl Clock + 'static) -> Self {
        let pages = PageCounter::new(config.total_pages);
        let swipe = SwipeTracker::new(config.swipe_threshold);
        let taps = DoubleTapGuard::new(config.double_tap_ms);
        Self {
            config,
            state: AppState {
                screen: ScreenId::Door,
                pages,
                door_opening: false,
            },
            view,
            audio: Box::new(Silent),
            factory: Box::new(NoLibrary),
            turner: None,
            clock: Box::new(clock),
            viewport: Viewport::default(),
            swipe,
            taps,
            outbox: Vec::new(),
            events: EventLog::new(0),
        }
    }

    /// Use this sink for the door and page-flip cues.
    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    /// Use this factory to build the library-backed viewer.
    pub fn with_turner_factory(mut self, factory: impl TurnerFactory + 'static) -> Self {
        self.factory = Box::new(factory);
        self
    }

    /// Cap the event log (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.events = EventLog::new(max);
        self
    }

    // ------------------------------------------------------------------
    // Screen transitions
    // ------------------------------------------------------------------

    /// Page-load entry point.
    ///
    /// Wide viewports go straight to the invitation; narrow ones get the
    /// door animation after the configured delay.
    pub fn start(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        for screen in ScreenId::ALL {
            self.view
                .set_screen_active(screen, screen == self.state.screen);
        }

        if viewport.is_desktop(self.config.desktop_min_width) {
            tracing::info!(%viewport, "wide viewport, skipping door animation");
            self.switch_screen(ScreenId::Invitation);
        } else {
            self.schedule(self.config.door_delay_ms, Task::OpenDoor);
        }
        self.schedule(self.config.warmup_delay_ms, Task::WarmFlipbook);
    }

    /// Start the door animation. Only the first call has any effect.
    pub fn open_door(&mut self) {
        if self.state.door_opening || self.state.screen != ScreenId::Door {
            tracing::debug!(screen = %self.state.screen, "door trigger ignored");
            self.emit(InviteEventKind::DoorTriggerIgnored, "door trigger ignored");
            return;
        }
        self.state.door_opening = true;

        self.play(Cue::DoorOpen);
        self.view.set_door_phase(DoorPhase::Zooming, true);
        self.emit(
            InviteEventKind::DoorPhaseStarted {
                phase: DoorPhase::Zooming,
            },
            "door zooming",
        );
        self.schedule(self.config.zoom_ms, Task::FinishZoom);
    }

    /// Leave the invitation for the flipbook, building the viewer on first
    /// entry.
    pub fn go_to_flipbook(&mut self) {
        if self.state.screen != ScreenId::Invitation {
            tracing::debug!(screen = %self.state.screen, "flipbook request ignored");
            return;
        }
        self.switch_screen(ScreenId::Flipbook);
        self.ensure_viewer();
    }

    /// Return to the invitation. The viewer is kept for the next visit.
    pub fn go_back_to_invitation(&mut self) {
        if self.state.screen != ScreenId::Flipbook {
            tracing::debug!(screen = %self.state.screen, "back request ignored");
            return;
        }
        self.switch_screen(ScreenId::Invitation);
    }

    /// Fire a task the host scheduled earlier.
    pub fn run_task(&mut self, task: Task) {
        tracing::trace!(%task, at_ms = self.clock.now_ms(), "running task");
        match task {
            Task::OpenDoor => self.open_door(),
            Task::FinishZoom => {
                self.view.set_door_phase(DoorPhase::Zooming, false);
                self.view.set_door_phase(DoorPhase::Opening, true);
                self.emit(
                    InviteEventKind::DoorPhaseStarted {
                        phase: DoorPhase::Opening,
                    },
                    "door opening",
                );
                self.schedule(self.config.open_ms, Task::FinishOpening);
            }
            Task::FinishOpening => {
                if self.state.screen == ScreenId::Door {
                    self.switch_screen(ScreenId::Invitation);
                }
            }
            Task::WarmFlipbook => {
                if self.state.screen == ScreenId::Flipbook && self.turner.is_none() {
                    self.build_viewer();
                }
            }
            Task::PumpTurnEvents => self.pump_turn_events(),
        }
    }

    fn switch_screen(&mut self, to: ScreenId) {
        let from = self.state.screen;
        if from == to {
            return;
        }
        self.view.set_screen_active(from, false);
        self.view.set_screen_active(to, true);
        self.state.screen = to;
        tracing::debug!(%from, %to, "screen changed");
        self.emit(
            InviteEventKind::ScreenChanged { from, to },
            format!("{from} -> {to}"),
        );
    }

    // ------------------------------------------------------------------
    // Flipbook
    // ------------------------------------------------------------------

    fn ensure_viewer(&mut self) {
        if self.config.rebuild_on_enter
            && let Some(mut old) = self.turner.take()
        {
            old.destroy();
            self.emit(InviteEventKind::ViewerDestroyed, "viewer destroyed");
        }

        match self.turner.as_mut() {
            None => self.build_viewer(),
            Some(turner) => {
                if turner.kind() == TurnerKind::Library {
                    turner.resize(self.viewport);
                }
                self.refresh_page_controls();
            }
        }
    }

    fn build_viewer(&mut self) {
        let built = self.factory.create(
            self.viewport,
            &self.config.turn,
            self.config.total_pages,
            self.state.pages.current(),
        );
        let turner: Box<dyn PageTurner> = match built {
            Some(turner) => turner,
            None => {
                tracing::warn!("turn library not loaded, using fallback navigation");
                Box::new(ManualTurner::new(self.state.pages, &mut self.view))
            }
        };
        let kind = turner.kind();
        self.turner = Some(turner);
        self.emit(
            InviteEventKind::ViewerBuilt { kind },
            format!("{kind:?} viewer built"),
        );
        self.refresh_page_controls();
    }

    /// Turn forward one page.
    pub fn next_page(&mut self) {
        self.navigate(NavAction::Next);
    }

    /// Turn back one page.
    pub fn previous_page(&mut self) {
        self.navigate(NavAction::Previous);
    }

    /// Jump straight to `page` (1-based).
    ///
    /// Pages outside `1..=total` are rejected before anything plays. Without
    /// a viewer the page is remembered and the viewer later opens on it.
    pub fn go_to_page(&mut self, page: u32) -> InviteResult<()> {
        let total = self.state.pages.total();
        if page == 0 || page > total {
            return Err(InviteError::PageOutOfRange { page, total });
        }
        self.play(Cue::PageFlip);

        match self.turner.as_mut() {
            Some(turner) => {
                turner.seek(page, &mut self.view);
                self.pump_turn_events();
            }
            None => {
                let before = self.state.pages.current();
                self.state.pages.seek(page)?;
                if page != before {
                    tracing::debug!(page, "no viewer yet, page remembered");
                    self.emit(
                        InviteEventKind::PageChanged { page },
                        format!("page {}", self.state.pages.label()),
                    );
                }
                self.refresh_page_controls();
            }
        }
        Ok(())
    }

    fn navigate(&mut self, action: NavAction) {
        self.play(Cue::PageFlip);

        let at_bound = match action {
            NavAction::Next => self.state.pages.is_last(),
            NavAction::Previous => self.state.pages.is_first(),
        };
        if at_bound {
            self.emit(
                InviteEventKind::PageBoundary { action },
                format!("no {action} page"),
            );
        }

        let Some(turner) = self.turner.as_mut() else {
            tracing::debug!(%action, "no viewer yet");
            return;
        };
        match action {
            NavAction::Next => turner.advance(&mut self.view),
            NavAction::Previous => turner.retreat(&mut self.view),
        }
        self.pump_turn_events();
    }

    /// Apply buffered turn callbacks to the page state and markers.
    pub fn pump_turn_events(&mut self) {
        let events = match self.turner.as_mut() {
            Some(turner) => turner.drain_events(),
            None => return,
        };
        for event in events {
            self.apply_turn_event(event);
        }
    }

    fn apply_turn_event(&mut self, event: TurnEvent) {
        match event {
            TurnEvent::Start(page) => {
                self.view.clear_page_markers(&[PageMarker::Flipping]);
                self.view.add_page_marker(page, PageMarker::Flipping);
            }
            TurnEvent::Turning(page) => {
                let before = self.state.pages.current();
                self.state.pages.set_clamped(page);
                let now = self.state.pages.current();
                if now != before {
                    self.emit(
                        InviteEventKind::PageChanged { page: now },
                        format!("page {}", self.state.pages.label()),
                    );
                }
                self.refresh_page_controls();
            }
            TurnEvent::Turned(page) => {
                self.view
                    .clear_page_markers(&[PageMarker::Turned, PageMarker::Flipping]);
                self.view.add_page_marker(page, PageMarker::Turned);
            }
        }
    }

    fn refresh_page_controls(&mut self) {
        let pages = self.state.pages;
        self.view.set_page_info(&pages.label());
        self.view.set_nav_enabled(!pages.is_first(), !pages.is_last());
    }

    /// Track the new viewport; resize the library viewer if it is showing.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if self.state.screen != ScreenId::Flipbook {
            return;
        }
        if let Some(turner) = self.turner.as_mut()
            && turner.kind() == TurnerKind::Library
        {
            turner.resize(viewport);
            self.emit(
                InviteEventKind::ViewerResized { viewport },
                format!("viewer resized to {viewport}"),
            );
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// A finger went down on the book.
    pub fn touch_start(&mut self, at: Point) {
        self.swipe.begin(at);
    }

    /// A finger lifted from the book. Returns the navigation it caused.
    pub fn touch_end(&mut self, at: Point) -> Option<NavAction> {
        let action = self.swipe.finish(at)?;
        tracing::debug!(%action, "swipe");
        self.navigate(action);
        Some(action)
    }

    /// Any touch-end on the document. Returns true when its default
    /// (double-tap zoom) should be prevented.
    pub fn document_touch_end(&mut self) -> bool {
        self.taps.touch_end(self.clock.now_ms() as f64)
    }

    /// A key went down. Returns true when the key was consumed and its
    /// default should be prevented.
    pub fn key_down(&mut self, key: Key) -> bool {
        if self.state.screen != ScreenId::Flipbook {
            return false;
        }
        match key.nav_action() {
            Some(action) => {
                self.navigate(action);
                true
            }
            None => false,
        }
    }

    /// Whether the long-press context menu should be prevented.
    pub fn blocks_context_menu(&self) -> bool {
        self.config.block_context_menu
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    fn schedule(&mut self, delay_ms: u32, task: Task) {
        let delay_ms = u64::from(delay_ms);
        let due_ms = self.clock.now_ms() + delay_ms;
        tracing::trace!(%task, due_ms, "scheduled");
        self.outbox.push(ScheduledTask {
            due_ms,
            delay_ms,
            task,
        });
    }

    fn play(&mut self, cue: Cue) {
        match self.audio.play(cue) {
            Ok(()) => self.emit(InviteEventKind::CuePlayed { cue }, format!("{cue} sound")),
            Err(e) => {
                tracing::warn!(%cue, error = %e, "sound play failed");
                self.emit(
                    InviteEventKind::CueFailed {
                        cue,
                        reason: e.to_string(),
                    },
                    format!("{cue} sound failed"),
                );
            }
        }
    }

    fn emit(&mut self, kind: InviteEventKind, description: impl Into<String>) {
        let at_ms = self.clock.now_ms();
        self.events.push(InviteEvent::new(at_ms, kind, description));
    }

    /// Tasks scheduled since the last call, in scheduling order.
    pub fn take_scheduled(&mut self) -> Vec<ScheduledTask> {
        std::mem::take(&mut self.outbox)
    }

    /// Session state.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// The active screen.
    pub fn screen(&self) -> ScreenId {
        self.state.screen
    }

    /// Current flipbook page (1-based).
    pub fn current_page(&self) -> u32 {
        self.state.pages.current()
    }

    /// Configuration the controller was built with.
    pub fn config(&self) -> &InviteConfig {
        &self.config
    }

    /// Last viewport seen by `start` or `resize`.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The bound view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Events logged so far.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Backend of the current viewer, if one was built.
    pub fn turner_kind(&self) -> Option<TurnerKind> {
        self.turner.as_ref().map(|t| t.kind())
    }
}
