//! Control registry
//!
//! Maps each logical control to its current live element and the listener
//! registrations the controller owns on it. Binding a role again drops the
//! previous registrations, which detaches those handlers, so re-running
//! attachment never stacks duplicate handlers.

use crate::error::{PlaybackError, Result};
use crate::platform::{Control, Platform};
use std::collections::HashMap;
use std::fmt;

/// Logical host controls the controller intercepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlRole {
    /// "Audio Player" button that opens the host's player chrome
    Toggle,
    /// Close button inside the player chrome
    Close,
    /// Play/pause button
    Play,
    /// Percent-played range input
    Scrub,
}

impl fmt::Display for ControlRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ControlRole::Toggle => "toggle",
            ControlRole::Close => "close",
            ControlRole::Play => "play",
            ControlRole::Scrub => "scrub",
        };
        f.write_str(name)
    }
}

struct Binding<P: Platform> {
    control: P::Control,
    listeners: Vec<P::Listener>,
}

pub struct ControlRegistry<P: Platform> {
    bindings: HashMap<ControlRole, Binding<P>>,
}

impl<P: Platform> ControlRegistry<P> {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Make `control` the live element for `role`
    ///
    /// Listeners registered on the previous element are dropped.
    pub fn bind(&mut self, role: ControlRole, control: P::Control) {
        if let Some(previous) = self.bindings.insert(
            role,
            Binding {
                control,
                listeners: Vec::new(),
            },
        ) {
            tracing::trace!(
                %role,
                detached = previous.listeners.len(),
                "Rebound control"
            );
        }
    }

    /// Keep `listener` alive for as long as `role` stays bound
    pub fn attach(&mut self, role: ControlRole, listener: P::Listener) -> Result<()> {
        let binding = self.bindings.get_mut(&role).ok_or_else(|| {
            PlaybackError::dom(format!("cannot attach a listener to unbound {role} control"))
        })?;
        binding.listeners.push(listener);
        Ok(())
    }

    /// Live element for `role`; stale (detached) elements read as absent
    pub fn live(&self, role: ControlRole) -> Option<P::Control> {
        self.bindings
            .get(&role)
            .map(|binding| &binding.control)
            .filter(|control| control.is_connected())
            .cloned()
    }

    pub fn listener_count(&self, role: ControlRole) -> usize {
        self.bindings
            .get(&role)
            .map_or(0, |binding| binding.listeners.len())
    }

    pub fn is_bound(&self, role: ControlRole) -> bool {
        self.bindings.contains_key(&role)
    }

    /// Drop the binding for `role`
    pub fn release(&mut self, role: ControlRole) {
        self.bindings.remove(&role);
    }

    /// Drop every binding, detaching all of its listeners
    ///
    /// Returns the number of bindings released.
    pub fn release_all(&mut self) -> usize {
        let released = self.bindings.len();
        self.bindings.clear();
        released
    }

    /// Drop every binding whose element has left the document
    ///
    /// Returns the number of bindings released.
    pub fn release_stale(&mut self) -> usize {
        let before = self.bindings.len();
        self.bindings
            .retain(|_, binding| binding.control.is_connected());
        before - self.bindings.len()
    }
}

impl<P: Platform> Default for ControlRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}
