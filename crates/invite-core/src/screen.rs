//! Screen identifiers, door phases, page markers, and the viewport.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Class that marks the one visible screen.
pub const ACTIVE_CLASS: &str = "active";

/// Identifies one of the three mutually exclusive screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenId {
    /// Animated splash with the closed door.
    Door,
    /// Invitation card shown once the door is open.
    Invitation,
    /// Page-turning book viewer.
    Flipbook,
}

impl ScreenId {
    /// All screens in presentation order.
    pub const ALL: [ScreenId; 3] = [ScreenId::Door, ScreenId::Invitation, ScreenId::Flipbook];

    /// Id of the container element hosting this screen.
    pub fn element_id(self) -> &'static str {
        match self {
            Self::Door => "door-screen",
            Self::Invitation => "invitation-screen",
            Self::Flipbook => "flipbook-screen",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Door => write!(f, "door"),
            Self::Invitation => write!(f, "invitation"),
            Self::Flipbook => write!(f, "flipbook"),
        }
    }
}

/// Visual phase classes applied to the door screen while it opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorPhase {
    /// Camera zooms toward the door, bottom text fades.
    Zooming,
    /// Door halves swing open.
    Opening,
}

impl DoorPhase {
    /// CSS class carried by the door screen during this phase.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Zooming => "door-zooming",
            Self::Opening => "door-opening",
        }
    }
}

/// Transient markers placed on flipbook pages by turn callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageMarker {
    /// The page is mid-turn.
    Flipping,
    /// The page just finished turning.
    Turned,
}

impl PageMarker {
    /// CSS class for this marker.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Flipping => "page-flipping",
            Self::Turned => "page-turned",
        }
    }
}

/// Size of the browser viewport in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// A `width` by `height` viewport.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether this viewport is wide enough to skip the door animation.
    pub fn is_desktop(&self, min_width: f64) -> bool {
        self.width >= min_width
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
