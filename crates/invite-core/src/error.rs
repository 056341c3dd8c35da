/// Alias for `Result<T, InviteError>`.
pub type InviteResult<T> = Result<T, InviteError>;

/// Errors raised by the invitation core.
///
/// None of these are fatal to a running page: the controller logs them and
/// keeps going. They surface as values so hosts and tests can inspect them.
#[derive(Debug, thiserror::Error)]
pub enum InviteError {
    /// A configuration value is out of its accepted range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A page number outside `1..=total` was requested.
    #[error("page {page} out of range 1..={total}")]
    PageOutOfRange {
        /// The rejected page number.
        page: u32,
        /// The number of pages in the book.
        total: u32,
    },

    /// An asset URL is not part of the preload manifest.
    #[error("unknown asset: {0}")]
    UnknownAsset(String),
}

/// Failure to play a sound cue.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    /// The runtime refused playback (e.g. no user gesture yet).
    #[error("playback rejected: {0}")]
    Rejected(String),

    /// The audio element could not be prepared.
    #[error("audio unavailable: {0}")]
    Unavailable(String),
}
