//! In-memory stand-ins for the browser: a recording view, a recording
//! audio sink, and a simulated turn library.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::TurnOptions;
use crate::error::AudioError;
use crate::page::PageCounter;
use crate::screen::{DoorPhase, PageMarker, ScreenId, Viewport};
use crate::turner::{PageTurner, TurnEvent, TurnerFactory, TurnerKind};
use crate::view::{AudioSink, Cue, View};

/// A [`View`] that keeps the would-be DOM state in memory.
///
/// Starts the way the host page does: door screen active, every page
/// visible, no markers.
#[derive(Debug, Clone)]
pub struct RecordingView {
    active: BTreeSet<ScreenId>,
    door_phases: Vec<DoorPhase>,
    page_info: String,
    nav_enabled: (bool, bool),
    hidden_pages: BTreeSet<u32>,
    markers: BTreeMap<u32, Vec<PageMarker>>,
    total_pages: u32,
}

impl RecordingView {
    /// A fresh page with `total_pages` flipbook pages.
    pub fn new(total_pages: u32) -> Self {
        Self {
            active: BTreeSet::from([ScreenId::Door]),
            door_phases: Vec::new(),
            page_info: String::new(),
            nav_enabled: (true, true),
            hidden_pages: BTreeSet::new(),
            markers: BTreeMap::new(),
            total_pages,
        }
    }

    /// Screens currently carrying the `active` marker.
    pub fn active_screens(&self) -> Vec<ScreenId> {
        ScreenId::ALL
            .into_iter()
            .filter(|s| self.active.contains(s))
            .collect()
    }

    /// Door phase classes currently applied, in the order they were added.
    pub fn door_phases(&self) -> Vec<DoorPhase> {
        self.door_phases.clone()
    }

    /// Text of the page-info control.
    pub fn page_info(&self) -> &str {
        &self.page_info
    }

    /// `(previous, next)` button enabled state.
    pub fn nav_enabled(&self) -> (bool, bool) {
        self.nav_enabled
    }

    /// Pages not hidden, ascending.
    pub fn visible_pages(&self) -> Vec<u32> {
        (1..=self.total_pages)
            .filter(|p| !self.hidden_pages.contains(p))
            .collect()
    }

    /// Markers on `page`.
    pub fn markers(&self, page: u32) -> Vec<PageMarker> {
        self.markers.get(&page).cloned().unwrap_or_default()
    }

}

impl View for RecordingView {
    fn set_screen_active(&mut self, screen: ScreenId, active: bool) {
        if active {
            self.active.insert(screen);
        } else {
            self.active.remove(&screen);
        }
    }

    fn set_door_phase(&mut self, phase: DoorPhase, on: bool) {
        self.door_phases.retain(|p| *p != phase);
        if on {
            self.door_phases.push(phase);
        }
    }

    fn set_page_info(&mut self, text: &str) {
        self.page_info = text.to_string();
    }

    fn set_nav_enabled(&mut self, previous: bool, next: bool) {
        self.nav_enabled = (previous, next);
    }

    fn set_page_visible(&mut self, page: u32, visible: bool) {
        if visible {
            self.hidden_pages.remove(&page);
        } else {
            self.hidden_pages.insert(page);
        }
    }

    fn clear_page_markers(&mut self, markers: &[PageMarker]) {
        for list in self.markers.values_mut() {
            list.retain(|m| !markers.contains(m));
        }
        self.markers.retain(|_, list| !list.is_empty());
    }

    fn add_page_marker(&mut self, page: u32, marker: PageMarker) {
        let list = self.markers.entry(page).or_default();
        if !list.contains(&marker) {
            list.push(marker);
        }
    }
}

/// An [`AudioSink`] that records cues and can be told to fail.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    played: Vec<Cue>,
    failure: Option<AudioError>,
}

impl RecordingAudio {
    /// A sink that plays everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every play attempt fails with `error`.
    pub fn failing(error: AudioError) -> Self {
        Self {
            played: Vec::new(),
            failure: Some(error),
        }
    }

    /// Cues played so far.
    pub fn played(&self) -> &[Cue] {
        &self.played
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: Cue) -> Result<(), AudioError> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        self.played.push(cue);
        Ok(())
    }
}

/// Factory standing in for a loaded turn library.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedLibrary;

impl TurnerFactory for SimulatedLibrary {
    fn create(
        &mut self,
        _viewport: Viewport,
        _options: &TurnOptions,
        total_pages: u32,
        start_page: u32,
    ) -> Option<Box<dyn PageTurner>> {
        let mut pages = PageCounter::new(total_pages);
        pages.set_clamped(start_page);
        Some(Box::new(SimulatedTurner {
            pages,
            pending: Vec::new(),
            destroyed: false,
        }))
    }
}

/// Library-like backend that completes every turn instantly, reporting
/// start, turning, and turned in that order.
#[derive(Debug, Clone)]
pub struct SimulatedTurner {
    pages: PageCounter,
    pending: Vec<TurnEvent>,
    destroyed: bool,
}

impl SimulatedTurner {
    fn turn(&mut self, step: impl FnOnce(&mut PageCounter) -> bool) {
        if self.destroyed {
            return;
        }
        let from = self.pages.current();
        if step(&mut self.pages) {
            let to = self.pages.current();
            self.pending.push(TurnEvent::Start(from));
            self.pending.push(TurnEvent::Turning(to));
            self.pending.push(TurnEvent::Turned(to));
        }
    }
}

impl PageTurner for SimulatedTurner {
    fn kind(&self) -> TurnerKind {
        TurnerKind::Library
    }

    fn advance(&mut self, _view: &mut dyn View) {
        self.turn(PageCounter::advance);
    }

    fn retreat(&mut self, _view: &mut dyn View) {
        self.turn(PageCounter::retreat);
    }

    fn seek(&mut self, page: u32, _view: &mut dyn View) {
        self.turn(|pages| page != pages.current() && pages.seek(page).is_ok());
    }

    fn resize(&mut self, _viewport: Viewport) {}

    fn destroy(&mut self) {
        self.destroyed = true;
        self.pending.clear();
    }

    fn drain_events(&mut self) -> Vec<TurnEvent> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_view_starts_on_door() {
        let view = RecordingView::new(3);
        assert_eq!(view.active_screens(), vec![ScreenId::Door]);
        assert_eq!(view.visible_pages(), vec![1, 2, 3]);
    }

    #[test]
    fn markers_are_cleared_across_pages() {
        let mut view = RecordingView::new(3);
        view.add_page_marker(1, PageMarker::Flipping);
        view.add_page_marker(2, PageMarker::Turned);
        view.clear_page_markers(&[PageMarker::Flipping]);
        assert!(view.markers(1).is_empty());
        assert_eq!(view.markers(2), vec![PageMarker::Turned]);
    }

    #[test]
    fn simulated_library_reports_full_lifecycle() {
        let mut view = RecordingView::new(13);
        let mut turner = SimulatedLibrary
            .create(Viewport::new(800.0, 600.0), &TurnOptions::default(), 13, 4)
            .unwrap();
        turner.advance(&mut view);
        assert_eq!(
            turner.drain_events(),
            vec![TurnEvent::Start(4), TurnEvent::Turning(5), TurnEvent::Turned(5)]
        );
    }

    #[test]
    fn simulated_library_seeks_in_one_turn() {
        let mut view = RecordingView::new(13);
        let mut turner = SimulatedLibrary
            .create(Viewport::new(800.0, 600.0), &TurnOptions::default(), 13, 2)
            .unwrap();
        turner.seek(9, &mut view);
        assert_eq!(
            turner.drain_events(),
            vec![TurnEvent::Start(2), TurnEvent::Turning(9), TurnEvent::Turned(9)]
        );
        turner.seek(9, &mut view);
        assert!(turner.drain_events().is_empty());
    }

    #[test]
    fn recording_audio_failure() {
        let mut audio = RecordingAudio::failing(AudioError::Rejected("policy".into()));
        assert!(audio.play(Cue::PageFlip).is_err());
        assert!(audio.played().is_empty());
    }
}
