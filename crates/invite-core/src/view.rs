//! Seams between the controller and whatever renders it.

use std::fmt;

use crate::assets::ASSET_DIR;
use crate::error::AudioError;
use crate::screen::{DoorPhase, PageMarker, ScreenId};

/// Rendering surface the controller drives.
///
/// The browser implementation toggles classes and styles on DOM elements;
/// tests and the CLI record the calls instead.
pub trait View {
    /// Add or remove the `active` marker on a screen container.
    fn set_screen_active(&mut self, screen: ScreenId, active: bool);

    /// Add or remove a door animation phase class.
    fn set_door_phase(&mut self, phase: DoorPhase, on: bool);

    /// Update the page-info text.
    fn set_page_info(&mut self, text: &str);

    /// Enable or disable the previous/next buttons.
    fn set_nav_enabled(&mut self, previous: bool, next: bool);

    /// Show or hide one page (1-based) in the fallback viewer.
    fn set_page_visible(&mut self, page: u32, visible: bool);

    /// Remove the given markers from every page.
    fn clear_page_markers(&mut self, markers: &[PageMarker]);

    /// Put a marker on one page (1-based).
    fn add_page_marker(&mut self, page: u32, marker: PageMarker);
}

/// The two short sound effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Played when the door opens.
    DoorOpen,
    /// Played on every navigation request.
    PageFlip,
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DoorOpen => write!(f, "door-open"),
            Self::PageFlip => write!(f, "page-flip"),
        }
    }
}

impl Cue {
    /// File the cue is played from, relative to the page.
    pub fn path(self) -> String {
        format!("{ASSET_DIR}/{self}.wav")
    }
}

/// Plays sound cues from the start.
pub trait AudioSink {
    /// Rewind and play `cue`.
    fn play(&mut self, cue: Cue) -> Result<(), AudioError>;
}

/// Audio sink that plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _cue: Cue) -> Result<(), AudioError> {
        Ok(())
    }
}
