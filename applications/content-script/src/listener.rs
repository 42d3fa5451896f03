//! Event listener and mutation observer registrations
//!
//! Both own the JS closure they installed. Dropping one removes the
//! closure from the page before freeing it, so the page never calls into
//! a dropped closure.

use crate::dom::js_error;
use narrator_playback::{Handler, Result};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, MutationObserver, MutationObserverInit, Node};

pub struct DomListener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut()>,
}

impl DomListener {
    pub fn attach(target: &EventTarget, event: &'static str, handler: Handler) -> Result<Self> {
        let callback = Closure::wrap(handler);
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(js_error)?;

        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for DomListener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}

/// Observes child-list changes anywhere under a node
pub struct DomObserver {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut()>,
}

impl DomObserver {
    pub fn observe(target: &Node, callback: Handler) -> Result<Self> {
        let callback = Closure::wrap(callback);
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref()).map_err(js_error)?;

        let options = MutationObserverInit::new();
        options.set_child_list(true);
        options.set_subtree(true);
        observer
            .observe_with_options(target, &options)
            .map_err(js_error)?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for DomObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
