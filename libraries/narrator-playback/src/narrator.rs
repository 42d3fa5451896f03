//! Narrator entry point

use crate::controller::PlaybackController;
use crate::error::Result;
use crate::navigation::NavigationWatcher;
use crate::platform::Platform;
use crate::state::PlaybackState;
use narrator_core::NarratorConfig;
use std::rc::Rc;

/// A running narration overlay
///
/// Keep it alive for the lifetime of the page. Dropping it stops watching
/// for navigation, cancels pending waits and detaches every intercept.
pub struct Narrator<P: Platform> {
    controller: PlaybackController<P>,
    _watcher: NavigationWatcher<P>,
}

impl<P: Platform> Narrator<P> {
    /// Validate `config`, start watching for navigation and run the first flow
    pub fn start(platform: Rc<P>, config: NarratorConfig) -> Result<Self> {
        config.validate()?;

        let controller =
            PlaybackController::new(Rc::clone(&platform), config, PlaybackState::new())?;
        let watcher = NavigationWatcher::install(&platform, controller.clone())?;

        let initial = controller.clone();
        platform.spawn(Box::pin(async move {
            let outcome = initial.initialize().await;
            tracing::debug!(?outcome, "Initial flow finished");
        }));

        tracing::info!(href = %platform.location_href(), "Narrator started");
        Ok(Self {
            controller,
            _watcher: watcher,
        })
    }

    pub fn controller(&self) -> &PlaybackController<P> {
        &self.controller
    }
}

impl<P: Platform> Drop for Narrator<P> {
    fn drop(&mut self) {
        self.controller.shutdown();
        tracing::debug!("Narrator shut down");
    }
}
