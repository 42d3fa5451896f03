//! Host platform abstraction
//!
//! Everything the controller needs from the browser goes through these
//! traits: element lookup, listener wiring, media loading, timers and task
//! spawning. The content script implements them over `web-sys`; tests use an
//! in-memory fake.
//!
//! All of it is single-threaded. Handlers are `FnMut` closures invoked on
//! the page's event loop, and no trait requires `Send`.

use crate::error::Result;
use async_trait::async_trait;
use narrator_core::{ElementPath, ResolvedAudioUrl};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// A detached unit of work for the page's event loop
pub type LocalTask = Pin<Box<dyn Future<Output = ()> + 'static>>;

/// Event handler attached to a control or media handle
pub type Handler = Box<dyn FnMut() + 'static>;

/// Events the controller listens for on host controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlEvent {
    Click,
    Input,
}

impl ControlEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            ControlEvent::Click => "click",
            ControlEvent::Input => "input",
        }
    }
}

/// Events the controller listens for on the audio handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaEvent {
    TimeUpdate,
    Play,
    Pause,
    Ended,
}

impl MediaEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaEvent::TimeUpdate => "timeupdate",
            MediaEvent::Play => "play",
            MediaEvent::Pause => "pause",
            MediaEvent::Ended => "ended",
        }
    }
}

/// Non-owning reference to a host page element
///
/// References go stale when the host re-renders. Check
/// [`Control::is_connected`] before trusting an old one.
pub trait Control: Clone + 'static {
    fn set_disabled(&self, disabled: bool);

    fn is_disabled(&self) -> bool;

    /// Whether the element is still part of the document
    fn is_connected(&self) -> bool;

    fn set_text(&self, text: &str);

    fn set_style(&self, property: &str, value: &str) -> Result<()>;

    fn set_value(&self, value: &str);

    fn value(&self) -> String;

    fn set_attribute(&self, name: &str, value: &str) -> Result<()>;
}

/// Playable audio handle provided by the platform decoder
pub trait Media: Clone + 'static {
    /// Start playback (asynchronous on most platforms; failures are logged there)
    fn play(&self);

    fn pause(&self);

    fn is_paused(&self) -> bool;

    /// Playback position in seconds
    fn current_time(&self) -> f64;

    fn set_current_time(&self, seconds: f64);

    /// Duration in seconds, NaN until metadata is known
    fn duration(&self) -> f64;

    /// URL the handle was created from
    fn source(&self) -> String;
}

/// Browser-like host the controller runs against
#[async_trait(?Send)]
pub trait Platform: 'static {
    type Control: Control;
    type Media: Media;

    /// Listener registration; dropping it detaches the handler
    type Listener: 'static;

    /// Mutation observation; dropping it stops observing
    type Observer: 'static;

    /// First element matching `selector`, if any
    fn query(&self, selector: &str) -> Option<Self::Control>;

    /// Walk `path.up` parents from `from`, then down through `path.children`
    fn traverse(&self, from: &Self::Control, path: &ElementPath) -> Option<Self::Control>;

    /// Replace `control` in the document with a listener-free copy of itself
    ///
    /// The copy takes the original's place; the original is detached and
    /// every handler on it, ours or the host's, goes with it.
    fn replace_with_clone(&self, control: &Self::Control) -> Result<Self::Control>;

    fn listen(
        &self,
        control: &Self::Control,
        event: ControlEvent,
        handler: Handler,
    ) -> Result<Self::Listener>;

    fn listen_media(
        &self,
        media: &Self::Media,
        event: MediaEvent,
        handler: Handler,
    ) -> Result<Self::Listener>;

    /// Full URL of the current page
    fn location_href(&self) -> String;

    /// Path component of the current page URL
    fn location_path(&self) -> String;

    /// Create a media handle and wait until it can play or fails to load
    async fn load_media(&self, url: &ResolvedAudioUrl) -> Result<Self::Media>;

    async fn sleep(&self, duration: Duration);

    /// Run `task` on the event loop without waiting for it
    fn spawn(&self, task: LocalTask);

    /// Call `callback` after every batch of structural document mutations
    fn observe_mutations(&self, callback: Handler) -> Result<Self::Observer>;
}
