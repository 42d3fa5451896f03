//! Scripture Narrator - Playback Orchestration
//!
//! Platform-agnostic orchestration of the narration overlay.
//!
//! This crate provides:
//! - Playback state holder (the single active audio handle)
//! - UI locator (lookup, polling for presence, listener stripping)
//! - Control registry (live element + owned intercepts per control)
//! - Playback controller (resolve -> load -> intercept, with re-binding)
//! - Navigation watcher (single-page-app route changes)
//!
//! # Architecture
//!
//! `narrator-playback` never touches the browser directly. Everything
//! host-specific goes through the [`Platform`] trait: element lookup,
//! listeners, media loading, timers, task spawning and mutation
//! observation. The content script implements it over `web-sys`.
//!
//! Everything runs on the page's single event loop. State lives behind
//! `Rc`/`RefCell`, and ordering comes from execution order rather than locks.
//!
//! # Example: Platform Integration
//!
//! ```rust,ignore
//! use narrator_core::NarratorConfig;
//! use narrator_playback::Narrator;
//! use std::rc::Rc;
//!
//! let platform = Rc::new(WebPlatform::new()?);
//! let narrator = Narrator::start(platform, NarratorConfig::default())?;
//! // keep `narrator` alive for the page lifetime
//! ```

mod controller;
mod error;
mod locator;
mod narrator;
mod navigation;
mod platform;
mod progress;
mod registry;
mod state;

// Public exports
pub use controller::{FlowOutcome, FlowPhase, PlaybackController};
pub use error::{PlaybackError, Result};
pub use locator::{PollCancel, PollPolicy, UiLocator};
pub use narrator::Narrator;
pub use navigation::{Navigation, NavigationWatcher, UrlTracker};
pub use platform::{Control, ControlEvent, Handler, LocalTask, Media, MediaEvent, Platform};
pub use progress::ProgressView;
pub use registry::{ControlRegistry, ControlRole};
pub use state::PlaybackState;
