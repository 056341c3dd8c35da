use serde::{Deserialize, Serialize};

use crate::error::{InviteError, InviteResult};

/// Fixed visual parameters handed to the turn library.
///
/// Width and height are not part of the options: they always come from the
/// current viewport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnOptions {
    /// Whether the library centres the book in its container.
    pub auto_center: bool,
    /// Hardware acceleration for the page transforms.
    pub acceleration: bool,
    /// Shading gradients drawn on turning pages.
    pub gradients: bool,
    /// Elevation of the page corner during a turn, in pixels.
    pub elevation: u32,
    /// Duration of one page turn in milliseconds.
    pub duration_ms: u32,
}

impl Default for TurnOptions {
    fn default() -> Self {
        Self {
            auto_center: false,
            acceleration: true,
            gradients: true,
            elevation: 50,
            duration_ms: 800,
        }
    }
}

/// Timing, layout, and input thresholds for one invitation session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InviteConfig {
    /// Viewports at least this wide skip the door animation.
    pub desktop_min_width: f64,
    /// Delay between page load and the automatic door opening.
    pub door_delay_ms: u32,
    /// Length of the zooming phase.
    pub zoom_ms: u32,
    /// Length of the opening phase before the invitation shows.
    pub open_ms: u32,
    /// Delay of the post-load flipbook warm-up check.
    pub warmup_delay_ms: u32,
    /// Number of pages in the flipbook.
    pub total_pages: u32,
    /// Minimum horizontal travel for a swipe, in logical pixels.
    pub swipe_threshold: f64,
    /// Two touch-ends closer than this suppress the second one's default.
    pub double_tap_ms: f64,
    /// Suppress the long-press context menu everywhere.
    pub block_context_menu: bool,
    /// Destroy and rebuild the viewer each time the flipbook is entered.
    pub rebuild_on_enter: bool,
    /// Options passed to the turn library.
    pub turn: TurnOptions,
}

impl Default for InviteConfig {
    fn default() -> Self {
        Self {
            desktop_min_width: 1024.0,
            door_delay_ms: 2000,
            zoom_ms: 800,
            open_ms: 1500,
            warmup_delay_ms: 1000,
            total_pages: 13,
            swipe_threshold: 50.0,
            double_tap_ms: 300.0,
            block_context_menu: true,
            rebuild_on_enter: false,
            turn: TurnOptions::default(),
        }
    }
}

impl InviteConfig {
    /// Reject values the controller cannot work with.
    pub fn validate(&self) -> InviteResult<()> {
        if self.total_pages == 0 {
            return Err(InviteError::InvalidConfig(
                "total_pages must be at least 1".into(),
            ));
        }
        if !self.desktop_min_width.is_finite() || self.desktop_min_width < 0.0 {
            return Err(InviteError::InvalidConfig(
                "desktop_min_width must be a finite, non-negative width".into(),
            ));
        }
        if !self.swipe_threshold.is_finite() || self.swipe_threshold <= 0.0 {
            return Err(InviteError::InvalidConfig(
                "swipe_threshold must be positive".into(),
            ));
        }
        if !self.double_tap_ms.is_finite() || self.double_tap_ms < 0.0 {
            return Err(InviteError::InvalidConfig(
                "double_tap_ms must be a finite, non-negative duration".into(),
            ));
        }
        Ok(())
    }

    /// Time from the door trigger until the invitation is visible.
    pub fn door_sequence_ms(&self) -> u32 {
        self.zoom_ms.saturating_add(self.open_ms)
    }

    /// Set the desktop breakpoint.
    pub fn with_desktop_min_width(mut self, width: f64) -> Self {
        self.desktop_min_width = width;
        self
    }

    /// Set the delay before the door opens on its own.
    pub fn with_door_delay_ms(mut self, ms: u32) -> Self {
        self.door_delay_ms = ms;
        self
    }

    /// Set the number of flipbook pages.
    pub fn with_total_pages(mut self, pages: u32) -> Self {
        self.total_pages = pages;
        self
    }

    /// Set the swipe distance threshold.
    pub fn with_swipe_threshold(mut self, px: f64) -> Self {
        self.swipe_threshold = px;
        self
    }

    /// Rebuild the viewer on every flipbook entry instead of reusing it.
    pub fn with_rebuild_on_enter(mut self, rebuild: bool) -> Self {
        self.rebuild_on_enter = rebuild;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = InviteConfig::default();
        assert_eq!(config.total_pages, 13);
        assert_eq!(config.door_delay_ms, 2000);
        assert_eq!(config.door_sequence_ms(), 2300);
        assert_eq!(config.turn.elevation, 50);
        assert_eq!(config.turn.duration_ms, 800);
        assert!(!config.turn.auto_center);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_builder_chain() {
        let config = InviteConfig::default()
            .with_desktop_min_width(800.0)
            .with_door_delay_ms(100)
            .with_total_pages(4)
            .with_rebuild_on_enter(true);
        assert!((config.desktop_min_width - 800.0).abs() < f64::EPSILON);
        assert_eq!(config.door_delay_ms, 100);
        assert_eq!(config.total_pages, 4);
        assert!(config.rebuild_on_enter);
    }

    #[test]
    fn config_rejects_zero_pages() {
        let err = InviteConfig::default().with_total_pages(0).validate();
        assert!(matches!(err, Err(InviteError::InvalidConfig(_))));
    }

    #[test]
    fn config_rejects_zero_threshold() {
        let err = InviteConfig::default()
            .with_swipe_threshold(0.0)
            .validate();
        assert!(matches!(err, Err(InviteError::InvalidConfig(_))));
    }

    #[test]
    fn config_rejects_non_finite_numbers() {
        let nan_width = InviteConfig::default().with_desktop_min_width(f64::NAN);
        let err = nan_width.validate().unwrap_err();
        assert!(err.to_string().contains("desktop_min_width"));

        let endless_swipe = InviteConfig::default().with_swipe_threshold(f64::INFINITY);
        assert!(endless_swipe.validate().is_err());

        let nan_tap = InviteConfig {
            double_tap_ms: f64::NAN,
            ..InviteConfig::default()
        };
        let err = nan_tap.validate().unwrap_err();
        assert!(err.to_string().contains("double_tap_ms"));
    }

    #[test]
    fn door_sequence_saturates() {
        let config = InviteConfig {
            zoom_ms: u32::MAX,
            open_ms: 300,
            ..InviteConfig::default()
        };
        assert_eq!(config.door_sequence_ms(), u32::MAX);
    }

    #[test]
    fn config_partial_json_fills_defaults() {
        let config: InviteConfig =
            serde_json::from_str(r#"{ "total_pages": 5, "turn": { "elevation": 10 } }"#).unwrap();
        assert_eq!(config.total_pages, 5);
        assert_eq!(config.turn.elevation, 10);
        assert_eq!(config.turn.duration_ms, 800);
        assert_eq!(config.door_delay_ms, 2000);
    }
}
