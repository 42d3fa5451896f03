//! UI locator - finding host controls and waiting for them to appear
//!
//! The host page renders its player chrome lazily and tears it down on
//! close, so most lookups are "wait until present". Readiness is detected by
//! polling. Whether the wait is bounded is a configuration choice
//! ([`PollPolicy::timeout`]); the default waits forever, and owners that
//! need to stop early hold a [`PollCancel`].

use crate::error::{PlaybackError, Result};
use crate::platform::Platform;
use narrator_core::TimingSettings;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// How to poll for an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,

    /// `None` polls indefinitely
    pub timeout: Option<Duration>,
}

impl PollPolicy {
    pub fn unbounded(interval: Duration) -> Self {
        Self {
            interval,
            timeout: None,
        }
    }

    pub fn bounded(interval: Duration, timeout: Duration) -> Self {
        Self {
            interval,
            timeout: Some(timeout),
        }
    }
}

impl From<&TimingSettings> for PollPolicy {
    fn from(timing: &TimingSettings) -> Self {
        Self {
            interval: timing.poll_interval(),
            timeout: timing.poll_timeout(),
        }
    }
}

/// Shared cancellation flag for a pending wait
#[derive(Debug, Clone, Default)]
pub struct PollCancel(Rc<Cell<bool>>);

impl PollCancel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

pub struct UiLocator<P: Platform> {
    platform: Rc<P>,
    policy: PollPolicy,
}

impl<P: Platform> UiLocator<P> {
    pub fn new(platform: Rc<P>, policy: PollPolicy) -> Self {
        Self { platform, policy }
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// First element matching `selector`, without waiting
    pub fn find(&self, selector: &str) -> Option<P::Control> {
        self.platform.query(selector)
    }

    /// Wait for `selector` using the locator's default policy
    pub async fn await_presence(&self, selector: &str) -> Result<P::Control> {
        self.await_presence_with(selector, self.policy, None).await
    }

    /// Wait for `selector`, checking once per `policy.interval`
    ///
    /// The document is checked immediately, so an element that is already
    /// present resolves without sleeping.
    pub async fn await_presence_with(
        &self,
        selector: &str,
        policy: PollPolicy,
        cancel: Option<&PollCancel>,
    ) -> Result<P::Control> {
        let mut waited = Duration::ZERO;

        loop {
            if cancel.is_some_and(PollCancel::is_cancelled) {
                return Err(PlaybackError::PollCancelled {
                    selector: selector.to_string(),
                });
            }

            if let Some(control) = self.find(selector) {
                return Ok(control);
            }

            if let Some(limit) = policy.timeout {
                if waited >= limit {
                    return Err(PlaybackError::ElementTimeout {
                        selector: selector.to_string(),
                        waited,
                    });
                }
            }

            self.platform.sleep(policy.interval).await;
            waited += policy.interval;
        }
    }

    /// Strip every handler from `control` by swapping in a fresh copy
    ///
    /// Returns the replacement, which holds the original's place in the
    /// document. Sibling controls are untouched.
    pub fn detach_all_listeners(&self, control: &P::Control) -> Result<P::Control> {
        self.platform.replace_with_clone(control)
    }
}
