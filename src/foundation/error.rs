/// Convenience result type used across Flagblend.
pub type BlendResult<T> = Result<T, BlendError>;

/// Top-level error taxonomy used by compositor APIs.
///
/// Per-source decode failures are deliberately *not* part of this enum: they are
/// recovered locally (the source is excluded from the mean) and reported as data
/// on [`crate::Composite`]. Only whole-invocation outcomes surface here.
#[derive(thiserror::Error, Debug)]
pub enum BlendError {
    /// The input source list was empty; no decode was attempted.
    #[error("no input: the source list is empty")]
    NoInput,

    /// Every source failed to decode, so there is nothing to average.
    #[error("all {attempted} sources failed to decode")]
    AllFailed {
        /// Number of sources that were attempted.
        attempted: usize,
    },

    /// The scratch raster surface could not be acquired.
    #[error("surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BlendError {
    /// Build a [`BlendError::SurfaceUnavailable`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::SurfaceUnavailable(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
