//! Error types for narration playback

use narrator_core::NarratorError;
use std::time::Duration;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Playback state read before any audio finished loading
    #[error("Audio file has not been loaded yet")]
    NotLoaded,

    /// Remote audio could not be fetched or decoded
    #[error("Unable to load narration audio {url}: {reason}")]
    LoadFailed { url: String, reason: String },

    /// A control required for attachment is not in the document
    #[error("Control not found: {selector}")]
    ElementMissing { selector: String },

    /// Bounded polling gave up
    #[error("Timed out after {waited:?} waiting for {selector}")]
    ElementTimeout { selector: String, waited: Duration },

    /// Polling cancelled by its owner
    #[error("Stopped waiting for {selector}")]
    PollCancelled { selector: String },

    /// Host DOM call failed
    #[error("DOM error: {0}")]
    Dom(String),

    /// Core errors (configuration, URLs)
    #[error(transparent)]
    Core(#[from] NarratorError),
}

impl PlaybackError {
    pub fn load_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LoadFailed {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn dom(msg: impl Into<String>) -> Self {
        Self::Dom(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
