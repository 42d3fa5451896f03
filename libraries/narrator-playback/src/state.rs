//! Playback state holder
//!
//! Owns the single active audio handle. A handle is replaced, never mutated,
//! when a new chapter loads; the old one is simply dropped.

use crate::error::{PlaybackError, Result};

#[derive(Debug)]
pub struct PlaybackState<M> {
    handle: Option<M>,
}

impl<M> PlaybackState<M> {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Store `handle`, replacing any previous one
    pub fn set(&mut self, handle: M) {
        self.handle = Some(handle);
    }

    /// Current handle
    ///
    /// Fails with [`PlaybackError::NotLoaded`] until the first successful load.
    pub fn get(&self) -> Result<&M> {
        self.handle.as_ref().ok_or(PlaybackError::NotLoaded)
    }

    pub fn is_loaded(&self) -> bool {
        self.handle.is_some()
    }
}

impl<M> Default for PlaybackState<M> {
    fn default() -> Self {
        Self::new()
    }
}
