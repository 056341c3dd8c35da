//! Core of the door invitation: screen controller, flipbook navigation,
//! gesture handling, and asset bookkeeping.
//!
//! Nothing in this crate touches a browser. Rendering, sound, timers, and
//! the page-turn library sit behind the [`View`], [`AudioSink`],
//! [`Clock`], and [`TurnerFactory`] seams so the whole interaction model
//! runs headless under [`Timeline`].

/// Image manifest and preload tracking.
pub mod assets;
/// Session time sources.
pub mod clock;
/// Tunable timings, thresholds, and turn library options.
pub mod config;
/// The screen controller and its session state.
pub mod controller;
/// Error types for the crate.
pub mod error;
/// Controller event types and the event log.
pub mod event;
/// Swipe, double-tap, and key handling.
pub mod gesture;
/// In-memory view, audio, and turn library for tests and headless runs.
pub mod headless;
/// Bounded flipbook page counter.
pub mod page;
/// Deferred controller tasks.
pub mod schedule;
/// Screen ids, door phases, page markers, and the viewport.
pub mod screen;
/// Virtual-clock driver for a controller.
pub mod timeline;
/// Page-turn backends.
pub mod turner;
/// Rendering and audio seams.
pub mod view;

pub use assets::{AssetManifest, AssetRole, PreloadTracker};
pub use clock::{Clock, VirtualClock};
pub use config::{InviteConfig, TurnOptions};
pub use controller::{AppState, Controller};
pub use error::{AudioError, InviteError, InviteResult};
pub use event::{EventLog, InviteEvent, InviteEventKind};
pub use gesture::{Key, NavAction, Point};
pub use page::PageCounter;
pub use schedule::{ScheduledTask, Task};
pub use screen::{DoorPhase, PageMarker, ScreenId, Viewport};
pub use timeline::Timeline;
pub use turner::{ManualTurner, NoLibrary, PageTurner, TurnEvent, TurnerFactory, TurnerKind};
pub use view::{AudioSink, Cue, Silent, View};
