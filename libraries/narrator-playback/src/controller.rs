//! Playback controller - core orchestration
//!
//! One flow per page (and per navigation):
//!
//! ```text
//! Idle -> Resolving -> Loading -> Ready -> (ListenerAttachmentFailed)
//!            |            |
//!            +------------+--> Disabled   (no chapter / load error)
//! ```
//!
//! The toggle control is disabled while resolving and loading and is
//! re-enabled exactly once when the flow leaves those phases, whatever the
//! outcome.
//!
//! The host page destroys and recreates its player controls every time the
//! player chrome opens or closes, so intercepts are re-attached in a cycle:
//! toggle click -> wait for close -> attach player intercepts; close click ->
//! stop audio -> wait for toggle -> attach toggle intercept.
//!
//! Flows are not cancelled. If a navigation fires while a load is pending,
//! whichever load completes last owns the playback state.
//!
//! A flow that ends without audio for the page detaches every intercept, so
//! the host's own player is left alone until the next navigation. The last
//! stored handle stays in the state holder.

use crate::error::{PlaybackError, Result};
use crate::locator::{PollCancel, PollPolicy, UiLocator};
use crate::navigation::Navigation;
use crate::platform::{Control, ControlEvent, Media, MediaEvent, Platform};
use crate::progress::ProgressView;
use crate::registry::{ControlRegistry, ControlRole};
use crate::state::PlaybackState;
use narrator_core::{seek_position, AudioResolver, ElementPath, NarratorConfig, ProgressSnapshot};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Where the controller's current flow stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPhase {
    /// No flow has run, or the page has no player
    Idle,
    /// Toggle disabled, mapping the page path to a URL
    Resolving,
    /// Waiting for the audio to become playable
    Loading,
    /// Audio stored and intercepts attached
    Ready,
    /// Audio stored but the host controls could not be intercepted
    ListenerAttachmentFailed,
    /// No audio for this page; inert until the next navigation
    Disabled,
}

/// How a single [`PlaybackController::initialize`] run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Neither the toggle nor the close control is on the page
    NoPlayer,
    /// The page path names no known chapter
    ResolutionMiss,
    /// The audio failed to load; previous state is kept
    LoadFailed,
    Ready,
    ListenerAttachmentFailed,
    /// The controller was shut down before the flow finished
    Stopped,
}

/// Disables a control for as long as the lock is held
struct ControlLock<C: Control> {
    control: C,
}

impl<C: Control> ControlLock<C> {
    fn engage(control: C) -> Self {
        control.set_disabled(true);
        Self { control }
    }
}

impl<C: Control> Drop for ControlLock<C> {
    fn drop(&mut self) {
        self.control.set_disabled(false);
    }
}

struct Inner<P: Platform> {
    platform: Rc<P>,
    config: NarratorConfig,
    resolver: AudioResolver,
    locator: UiLocator<P>,
    state: RefCell<PlaybackState<P::Media>>,
    registry: RefCell<ControlRegistry<P>>,
    media_listeners: RefCell<Vec<P::Listener>>,
    phase: Cell<FlowPhase>,
    shutdown: PollCancel,
}

/// Orchestrates resolution, loading and control interception
///
/// Cheap to clone; clones share the same state.
pub struct PlaybackController<P: Platform> {
    inner: Rc<Inner<P>>,
}

impl<P: Platform> Clone for PlaybackController<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<P: Platform> PlaybackController<P> {
    /// Create a controller that owns `state`
    pub fn new(
        platform: Rc<P>,
        config: NarratorConfig,
        state: PlaybackState<P::Media>,
    ) -> Result<Self> {
        let resolver = config.resolver()?;
        let locator = UiLocator::new(Rc::clone(&platform), PollPolicy::from(&config.timing));

        Ok(Self {
            inner: Rc::new(Inner {
                platform,
                config,
                resolver,
                locator,
                state: RefCell::new(state),
                registry: RefCell::new(ControlRegistry::new()),
                media_listeners: RefCell::new(Vec::new()),
                phase: Cell::new(FlowPhase::Idle),
                shutdown: PollCancel::new(),
            }),
        })
    }

    fn upgrade(weak: &Weak<Inner<P>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn phase(&self) -> FlowPhase {
        self.inner.phase.get()
    }

    fn set_phase(&self, phase: FlowPhase) {
        tracing::trace!(?phase, "Flow phase");
        self.inner.phase.set(phase);
    }

    pub fn config(&self) -> &NarratorConfig {
        &self.inner.config
    }

    pub fn locator(&self) -> &UiLocator<P> {
        &self.inner.locator
    }

    /// Active audio handle
    ///
    /// Fails with [`PlaybackError::NotLoaded`] before the first successful load.
    pub fn current_media(&self) -> Result<P::Media> {
        self.inner.state.borrow().get().cloned()
    }

    /// Live element currently bound to `role`
    pub fn live_control(&self, role: ControlRole) -> Option<P::Control> {
        self.inner.registry.borrow().live(role)
    }

    /// Number of intercepts the controller holds on `role`
    pub fn listener_count(&self, role: ControlRole) -> usize {
        self.inner.registry.borrow().listener_count(role)
    }

    /// Run the full flow for the current page
    pub async fn initialize(&self) -> FlowOutcome {
        if self.is_shut_down() {
            return FlowOutcome::Stopped;
        }

        // Player chrome from the previous page may be gone already
        let released = self.inner.registry.borrow_mut().release_stale();
        if released > 0 {
            tracing::debug!(released, "Released stale controls");
        }

        let selectors = &self.inner.config.selectors;
        let toggle = self.inner.locator.find(&selectors.toggle);
        let close = self.inner.locator.find(&selectors.close);

        if toggle.is_none() && close.is_none() {
            tracing::debug!("No audio player controls on this page");
            self.set_phase(FlowPhase::Idle);
            return FlowOutcome::NoPlayer;
        }

        let has_toggle = toggle.is_some();
        let _lock = toggle.map(ControlLock::engage);
        self.run_flow(has_toggle).await
    }

    async fn run_flow(&self, has_toggle: bool) -> FlowOutcome {
        self.set_phase(FlowPhase::Resolving);
        let path = self.inner.platform.location_path();
        let Some(url) = self.inner.resolver.resolve(&path) else {
            tracing::info!(path = %path, "No narration for this page");
            self.disarm();
            self.set_phase(FlowPhase::Disabled);
            return FlowOutcome::ResolutionMiss;
        };

        self.set_phase(FlowPhase::Loading);
        let media = match self.inner.platform.load_media(&url).await {
            Ok(media) => media,
            Err(e) => {
                tracing::error!(url = %url, error = %e, "Failed to load narration");
                self.disarm();
                self.set_phase(FlowPhase::Disabled);
                return FlowOutcome::LoadFailed;
            }
        };

        if self.is_shut_down() {
            tracing::debug!(url = %url, "Discarding narration loaded after shutdown");
            return FlowOutcome::Stopped;
        }

        tracing::info!(url = %url, "Narration ready");
        self.inner.state.borrow_mut().set(media);
        // Listeners on the replaced handle
        self.inner.media_listeners.borrow_mut().clear();
        self.set_phase(FlowPhase::Ready);

        let attached = if has_toggle {
            self.attach_toggle_intercepts()
        } else {
            self.attach_player_intercepts().await
        };

        match attached {
            Ok(()) => FlowOutcome::Ready,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to intercept player controls");
                self.set_phase(FlowPhase::ListenerAttachmentFailed);
                FlowOutcome::ListenerAttachmentFailed
            }
        }
    }

    /// Detach every intercept, leaving the host controls to the host
    fn disarm(&self) {
        let released = self.inner.registry.borrow_mut().release_all();
        self.inner.media_listeners.borrow_mut().clear();
        tracing::debug!(released, "Intercepts detached");
    }

    /// Stop pending waits and detach every intercept
    ///
    /// Flows still in flight end with [`FlowOutcome::Stopped`]; nothing is
    /// re-attached afterwards.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
        self.disarm();
        self.set_phase(FlowPhase::Idle);
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }

    async fn await_control(&self, selector: &str) -> Result<P::Control> {
        let locator = &self.inner.locator;
        locator
            .await_presence_with(selector, locator.policy(), Some(&self.inner.shutdown))
            .await
    }

    /// Intercept the toggle so opening the player chrome wires up its controls
    pub fn attach_toggle_intercepts(&self) -> Result<()> {
        let selector = &self.inner.config.selectors.toggle;
        let toggle = self
            .inner
            .locator
            .find(selector)
            .ok_or_else(|| PlaybackError::ElementMissing {
                selector: selector.clone(),
            })?;

        let weak = Rc::downgrade(&self.inner);
        let listener = self.inner.platform.listen(
            &toggle,
            ControlEvent::Click,
            Box::new(move || {
                let Some(controller) = Self::upgrade(&weak) else {
                    return;
                };
                let task = controller.clone();
                controller.inner.platform.spawn(Box::pin(async move {
                    match task.attach_player_intercepts().await {
                        Ok(()) => {}
                        Err(e) if task.is_shut_down() => {
                            tracing::debug!(error = %e, "Player wait ended by shutdown");
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to intercept player controls")
                        }
                    }
                }));
            }),
        )?;

        let mut registry = self.inner.registry.borrow_mut();
        registry.bind(ControlRole::Toggle, toggle);
        registry.attach(ControlRole::Toggle, listener)
    }

    /// Wait for the host's player chrome and intercept close, play and scrub
    pub async fn attach_player_intercepts(&self) -> Result<()> {
        let media = self.current_media()?;
        let selectors = &self.inner.config.selectors;

        // Listeners from a previous attachment would double every update
        self.inner.media_listeners.borrow_mut().clear();

        let close = self.await_control(&selectors.close).await?;
        self.bind_close(close)?;

        let play = self.await_control(&selectors.play).await?;
        self.bind_play(&play, &media)?;

        let scrub = self.await_control(&selectors.scrub).await?;
        self.bind_progress(scrub, &media)?;

        tracing::debug!(source = %media.source(), "Player intercepts attached");
        Ok(())
    }

    fn bind_close(&self, close: P::Control) -> Result<()> {
        let weak = Rc::downgrade(&self.inner);
        let listener = self.inner.platform.listen(
            &close,
            ControlEvent::Click,
            Box::new(move || {
                let Some(controller) = Self::upgrade(&weak) else {
                    return;
                };
                controller.stop_and_rewind();
                let task = controller.clone();
                controller
                    .inner
                    .platform
                    .spawn(Box::pin(async move { task.rebind_after_close().await }));
            }),
        )?;

        let mut registry = self.inner.registry.borrow_mut();
        registry.bind(ControlRole::Close, close);
        registry.attach(ControlRole::Close, listener)
    }

    fn stop_and_rewind(&self) {
        match self.current_media() {
            Ok(media) => {
                media.pause();
                media.set_current_time(0.0);
            }
            Err(e) => tracing::warn!(error = %e, "Player closed without narration"),
        }
    }

    async fn rebind_after_close(&self) {
        let selector = &self.inner.config.selectors.toggle;
        if let Err(e) = self.await_control(selector).await {
            if self.is_shut_down() {
                tracing::debug!(error = %e, "Toggle wait ended by shutdown");
            } else {
                tracing::warn!(error = %e, "Toggle did not come back after close");
            }
            return;
        }

        let released = self.inner.registry.borrow_mut().release_stale();
        tracing::debug!(released, "Player chrome closed");

        if let Err(e) = self.attach_toggle_intercepts() {
            tracing::warn!(error = %e, "Failed to intercept toggle");
        }
    }

    fn bind_play(&self, play: &P::Control, media: &P::Media) -> Result<()> {
        // The host's own play handler goes away with the swap
        let play = self.inner.locator.detach_all_listeners(play)?;

        let weak = Rc::downgrade(&self.inner);
        let listener = self.inner.platform.listen(
            &play,
            ControlEvent::Click,
            Box::new(move || {
                if let Some(controller) = Self::upgrade(&weak) {
                    controller.toggle_playback();
                }
            }),
        )?;

        {
            let mut registry = self.inner.registry.borrow_mut();
            registry.bind(ControlRole::Play, play);
            registry.attach(ControlRole::Play, listener)?;
        }
        self.reflect_play_state(media.is_paused());

        for event in [MediaEvent::Play, MediaEvent::Pause, MediaEvent::Ended] {
            let weak = Rc::downgrade(&self.inner);
            let handle = media.clone();
            let listener = self.inner.platform.listen_media(
                media,
                event,
                Box::new(move || {
                    if let Some(controller) = Self::upgrade(&weak) {
                        controller.reflect_play_state(handle.is_paused());
                    }
                }),
            )?;
            self.inner.media_listeners.borrow_mut().push(listener);
        }

        Ok(())
    }

    fn toggle_playback(&self) {
        let media = match self.current_media() {
            Ok(media) => media,
            Err(e) => {
                tracing::warn!(error = %e, "Play pressed without narration");
                return;
            }
        };

        if media.is_paused() {
            media.play();
        } else {
            media.pause();
        }
        self.reflect_play_state(media.is_paused());
    }

    fn reflect_play_state(&self, paused: bool) {
        let Some(play) = self.live_control(ControlRole::Play) else {
            return;
        };

        let labels = &self.inner.config.labels;
        let (label, playing) = if paused {
            (&labels.play, "false")
        } else {
            (&labels.pause, "true")
        };

        let result = play
            .set_attribute("aria-label", label)
            .and_then(|()| play.set_attribute("data-playing", playing));
        if let Err(e) = result {
            tracing::debug!(error = %e, "Could not update play control");
        }
    }

    fn bind_progress(&self, scrub: P::Control, media: &P::Media) -> Result<()> {
        let layout = &self.inner.config.progress_layout;
        let view = ProgressView {
            scrub: scrub.clone(),
            fill: self.locate_part(&scrub, &layout.fill, "progress fill"),
            elapsed: self.locate_part(&scrub, &layout.elapsed_label, "elapsed label"),
            total: self.locate_part(&scrub, &layout.total_label, "total label"),
        };
        view.render(&ProgressSnapshot::new(media.current_time(), media.duration()));

        let handle = media.clone();
        let timeupdate = self.inner.platform.listen_media(
            media,
            MediaEvent::TimeUpdate,
            Box::new(move || {
                view.render(&ProgressSnapshot::new(
                    handle.current_time(),
                    handle.duration(),
                ));
            }),
        )?;
        self.inner.media_listeners.borrow_mut().push(timeupdate);

        let handle = media.clone();
        let input = scrub.clone();
        let seek = self.inner.platform.listen(
            &scrub,
            ControlEvent::Input,
            Box::new(move || {
                let Ok(percent) = input.value().trim().parse::<f64>() else {
                    return;
                };
                if let Some(position) = seek_position(percent, handle.duration()) {
                    handle.set_current_time(position);
                }
            }),
        )?;

        let mut registry = self.inner.registry.borrow_mut();
        registry.bind(ControlRole::Scrub, scrub);
        registry.attach(ControlRole::Scrub, seek)
    }

    fn locate_part(
        &self,
        scrub: &P::Control,
        path: &ElementPath,
        name: &str,
    ) -> Option<P::Control> {
        let part = self.inner.platform.traverse(scrub, path);
        if part.is_none() {
            tracing::warn!(part = name, ?path, "Progress element not at expected position");
        }
        part
    }

    /// React to a client-side route change
    ///
    /// Pauses audio that is still playing, then re-runs the whole flow once
    /// the host has had the settling delay to render the new chapter.
    pub fn handle_navigation(&self, navigation: &Navigation) {
        tracing::info!(from = %navigation.from, to = %navigation.to, "Host page navigated");

        match self.current_media() {
            Ok(media) if !media.is_paused() => media.pause(),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Nothing to pause on navigation"),
        }

        let controller = self.clone();
        let delay = self.inner.config.timing.settling_delay();
        self.inner.platform.spawn(Box::pin(async move {
            controller.inner.platform.sleep(delay).await;
            let outcome = controller.initialize().await;
            tracing::debug!(?outcome, "Flow finished after navigation");
        }));
    }
}
