//! Page-turn backends: the external turn library or manual show/hide.

use crate::config::TurnOptions;
use crate::page::PageCounter;
use crate::screen::Viewport;
use crate::view::View;

/// Lifecycle callbacks reported by a backend, carrying a 1-based page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEvent {
    /// A page started turning.
    Start(u32),
    /// The book is moving to this page.
    Turning(u32),
    /// The turn animation finished on this page.
    Turned(u32),
}

/// Which backend is rendering the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnerKind {
    /// The external turn library.
    Library,
    /// Show/hide fallback.
    Manual,
}

/// Capability interface over a page-turn backend.
///
/// Construction is initialization; see [`TurnerFactory`]. Backends buffer
/// their lifecycle callbacks and hand them over through
/// [`PageTurner::drain_events`], so a callback never re-enters the
/// controller while it is busy.
pub trait PageTurner {
    /// Which backend this is.
    fn kind(&self) -> TurnerKind;

    /// Turn forward one page.
    fn advance(&mut self, view: &mut dyn View);

    /// Turn back one page.
    fn retreat(&mut self, view: &mut dyn View);

    /// Jump to `page`, already checked to be within `1..=total`.
    fn seek(&mut self, page: u32, view: &mut dyn View);

    /// Fit the book to a new viewport.
    fn resize(&mut self, viewport: Viewport);

    /// Tear the backend down. The turner must not be used afterwards.
    fn destroy(&mut self);

    /// Take the callbacks recorded since the last drain, oldest first.
    fn drain_events(&mut self) -> Vec<TurnEvent>;
}

/// Builds the library-backed viewer when the library is present.
pub trait TurnerFactory {
    /// Open a book of `total_pages` pages at `start_page`.
    ///
    /// Returns `None` when the turn library is not loaded.
    fn create(
        &mut self,
        viewport: Viewport,
        options: &TurnOptions,
        total_pages: u32,
        start_page: u32,
    ) -> Option<Box<dyn PageTurner>>;
}

/// Factory for hosts without the turn library.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLibrary;

impl TurnerFactory for NoLibrary {
    fn create(&mut self, _: Viewport, _: &TurnOptions, _: u32, _: u32) -> Option<Box<dyn PageTurner>> {
        None
    }
}

/// Fallback backend: exactly one page visible, clamped at both ends.
#[derive(Debug, Clone)]
pub struct ManualTurner {
    pages: PageCounter,
    pending: Vec<TurnEvent>,
}

impl ManualTurner {
    /// Show `pages.current()` and hide every other page.
    pub fn new(pages: PageCounter, view: &mut dyn View) -> Self {
        for page in 1..=pages.total() {
            view.set_page_visible(page, page == pages.current());
        }
        Self {
            pages,
            pending: Vec::new(),
        }
    }

    /// Page currently shown.
    pub fn current(&self) -> u32 {
        self.pages.current()
    }

    fn show(&mut self, from: u32, view: &mut dyn View) {
        let to = self.pages.current();
        view.set_page_visible(from, false);
        view.set_page_visible(to, true);
        self.pending.push(TurnEvent::Turning(to));
    }
}

impl PageTurner for ManualTurner {
    fn kind(&self) -> TurnerKind {
        TurnerKind::Manual
    }

    fn advance(&mut self, view: &mut dyn View) {
        let from = self.pages.current();
        if self.pages.advance() {
            self.show(from, view);
        }
    }

    fn retreat(&mut self, view: &mut dyn View) {
        let from = self.pages.current();
        if self.pages.retreat() {
            self.show(from, view);
        }
    }

    fn seek(&mut self, page: u32, view: &mut dyn View) {
        let from = self.pages.current();
        if page != from && self.pages.seek(page).is_ok() {
            self.show(from, view);
        }
    }

    fn resize(&mut self, _viewport: Viewport) {}

    fn destroy(&mut self) {
        self.pending.clear();
    }

    fn drain_events(&mut self) -> Vec<TurnEvent> {
        std::mem::take(&mut self.pending)
    }
}
