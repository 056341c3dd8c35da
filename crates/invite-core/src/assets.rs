//! Static asset manifest and best-effort image preload bookkeeping.

use std::fmt;

use crate::error::{InviteError, InviteResult};
use crate::view::Cue;

/// Directory all assets live under, relative to the page.
pub const ASSET_DIR: &str = "data";

/// What an asset is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetRole {
    /// Left door panel.
    LeftDoor,
    /// Right door panel.
    RightDoor,
    /// Left half of the text band under the doors.
    LeftBottomText,
    /// Right half of the text band.
    RightBottomText,
    /// Backdrop behind the invitation card.
    InvitationBackdrop,
    /// A flipbook page (1-based).
    Page(u32),
    /// A sound cue.
    Sound(Cue),
}

impl AssetRole {
    /// Path of the asset relative to the page.
    pub fn path(self) -> String {
        match self {
            Self::LeftDoor => format!("{ASSET_DIR}/left_door.jpeg"),
            Self::RightDoor => format!("{ASSET_DIR}/right_door.jpeg"),
            Self::LeftBottomText => format!("{ASSET_DIR}/left_bottom_text.jpeg"),
            Self::RightBottomText => format!("{ASSET_DIR}/right_bottom_text.jpeg"),
            Self::InvitationBackdrop => format!("{ASSET_DIR}/2.jpeg"),
            // Pages are numbered after the backdrop: page 1 is 3.jpeg.
            Self::Page(n) => format!("{ASSET_DIR}/{}.jpeg", n + 2),
            Self::Sound(cue) => cue.path(),
        }
    }

    /// Everything except the sound cues.
    pub fn is_image(self) -> bool {
        !matches!(self, Self::Sound(_))
    }
}

impl fmt::Display for AssetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeftDoor => write!(f, "left door"),
            Self::RightDoor => write!(f, "right door"),
            Self::LeftBottomText => write!(f, "left bottom text"),
            Self::RightBottomText => write!(f, "right bottom text"),
            Self::InvitationBackdrop => write!(f, "invitation backdrop"),
            Self::Page(n) => write!(f, "page {n}"),
            Self::Sound(cue) => write!(f, "{cue} sound"),
        }
    }
}

/// One entry of the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// What the image is for.
    pub role: AssetRole,
    /// Path relative to the page.
    pub path: String,
}

/// Ordered list of every file the invitation loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetManifest {
    assets: Vec<Asset>,
}

impl AssetManifest {
    /// Door art, bottom text halves, backdrop, `total_pages` pages, then the
    /// two sound cues.
    pub fn for_pages(total_pages: u32) -> Self {
        let mut roles = vec![
            AssetRole::LeftDoor,
            AssetRole::RightDoor,
            AssetRole::LeftBottomText,
            AssetRole::RightBottomText,
            AssetRole::InvitationBackdrop,
        ];
        roles.extend((1..=total_pages).map(AssetRole::Page));
        roles.extend([Cue::DoorOpen, Cue::PageFlip].map(AssetRole::Sound));
        let assets = roles
            .into_iter()
            .map(|role| Asset {
                role,
                path: role.path(),
            })
            .collect();
        Self { assets }
    }

    /// Entries in load order.
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// True for a manifest with no entries.
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Paths of every entry, in order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(|a| a.path.as_str())
    }

    /// Paths of the image entries only.
    pub fn image_paths(&self) -> impl Iterator<Item = &str> {
        self.assets
            .iter()
            .filter(|a| a.role.is_image())
            .map(|a| a.path.as_str())
    }

    /// Number of image entries.
    pub fn image_count(&self) -> usize {
        self.image_paths().count()
    }
}

/// Load state of one preloaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Requested, no result yet.
    Pending,
    /// The image loaded.
    Loaded,
    /// The image failed to load.
    Failed,
}

/// Tracks independent load results for every manifest image.
///
/// Failures are logged and counted; they never block anything.
#[derive(Debug, Clone)]
pub struct PreloadTracker {
    entries: Vec<(String, LoadState)>,
}

impl PreloadTracker {
    /// Every manifest image starts out pending.
    pub fn new(manifest: &AssetManifest) -> Self {
        Self {
            entries: manifest
                .image_paths()
                .map(|p| (p.to_string(), LoadState::Pending))
                .collect(),
        }
    }

    /// Record a successful load.
    pub fn mark_loaded(&mut self, path: &str) -> InviteResult<()> {
        self.settle(path, LoadState::Loaded)
    }

    /// Record a failed load.
    pub fn mark_failed(&mut self, path: &str) -> InviteResult<()> {
        tracing::warn!(path, "failed to load image");
        self.settle(path, LoadState::Failed)
    }

    fn settle(&mut self, path: &str, state: LoadState) -> InviteResult<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|(p, _)| p == path)
            .ok_or_else(|| InviteError::UnknownAsset(path.to_string()))?;
        let was_pending = entry.1 == LoadState::Pending;
        entry.1 = state;

        if was_pending && self.is_settled() {
            let failed = self.count(LoadState::Failed);
            if failed == 0 {
                tracing::info!(count = self.entries.len(), "all images preloaded");
            } else {
                tracing::info!(
                    loaded = self.count(LoadState::Loaded),
                    failed,
                    "image preload finished with failures"
                );
            }
        }
        Ok(())
    }

    /// State of one path, `None` if it is not tracked.
    pub fn state(&self, path: &str) -> Option<LoadState> {
        self.entries
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, s)| *s)
    }

    /// How many entries are in `state`.
    pub fn count(&self, state: LoadState) -> usize {
        self.entries.iter().filter(|(_, s)| *s == state).count()
    }

    /// Every entry has either loaded or failed.
    pub fn is_settled(&self) -> bool {
        self.count(LoadState::Pending) == 0
    }
}
