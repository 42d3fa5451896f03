//! Navigation watcher
//!
//! The host's scripture reader is a single-page app: following a chapter
//! link swaps the page content and URL without reloading the content
//! script. Document mutations are the only reliable signal, so every
//! mutation batch compares the current URL with the last one seen.

use crate::controller::PlaybackController;
use crate::error::Result;
use crate::platform::Platform;
use std::rc::Rc;

/// A client-side route change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub from: String,
    pub to: String,
}

/// Remembers the last URL and reports each distinct change once
#[derive(Debug, Clone)]
pub struct UrlTracker {
    last_url: String,
}

impl UrlTracker {
    pub fn new(initial_url: impl Into<String>) -> Self {
        Self {
            last_url: initial_url.into(),
        }
    }

    pub fn last_url(&self) -> &str {
        &self.last_url
    }

    /// Compare `current_url` with the last URL seen
    ///
    /// Returns the navigation when it differs. Repeated mutations during the
    /// same navigation see an unchanged URL and return `None`.
    pub fn observe(&mut self, current_url: &str) -> Option<Navigation> {
        if current_url == self.last_url {
            return None;
        }

        let from = std::mem::replace(&mut self.last_url, current_url.to_string());
        Some(Navigation {
            from,
            to: current_url.to_string(),
        })
    }
}

/// Restarts the controller whenever the host page changes route
///
/// Observation stops when the watcher is dropped.
pub struct NavigationWatcher<P: Platform> {
    _observer: P::Observer,
}

impl<P: Platform> NavigationWatcher<P> {
    pub fn install(platform: &Rc<P>, controller: PlaybackController<P>) -> Result<Self> {
        let mut tracker = UrlTracker::new(platform.location_href());
        let weak_platform = Rc::downgrade(platform);

        let observer = platform.observe_mutations(Box::new(move || {
            let Some(platform) = weak_platform.upgrade() else {
                return;
            };
            if let Some(navigation) = tracker.observe(&platform.location_href()) {
                controller.handle_navigation(&navigation);
            }
        }))?;

        tracing::debug!("Watching host page for navigation");
        Ok(Self {
            _observer: observer,
        })
    }
}
