use crate::error::{InviteError, InviteResult};

/// Current position in the flipbook, always within `1..=total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCounter {
    current: u32,
    total: u32,
}

impl PageCounter {
    /// Start at page 1 of a book with `total` pages (at least one).
    pub fn new(total: u32) -> Self {
        Self {
            current: 1,
            total: total.max(1),
        }
    }

    /// The current page.
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Number of pages.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// On page 1.
    pub fn is_first(&self) -> bool {
        self.current <= 1
    }

    /// On the last page.
    pub fn is_last(&self) -> bool {
        self.current >= self.total
    }

    /// Step forward. Returns false (and stays put) on the last page.
    pub fn advance(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Step back. Returns false (and stays put) on the first page.
    pub fn retreat(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Jump to an exact page, rejecting anything out of range.
    pub fn seek(&mut self, page: u32) -> InviteResult<()> {
        if page == 0 || page > self.total {
            return Err(InviteError::PageOutOfRange {
                page,
                total: self.total,
            });
        }
        self.current = page;
        Ok(())
    }

    /// Adopt a page reported by the turn library, clamped into range.
    pub fn set_clamped(&mut self, page: u32) {
        self.current = page.clamp(1, self.total);
    }

    /// Text shown in the page-info control, e.g. `3 / 13`.
    pub fn label(&self) -> String {
        format!("{} / {}", self.current, self.total)
    }
}
