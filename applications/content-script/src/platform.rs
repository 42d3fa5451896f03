//! [`Platform`] over the live browser page

use crate::dom::{describe, js_error, WebControl};
use crate::listener::{DomListener, DomObserver};
use crate::media::WebMedia;
use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use narrator_core::{ElementPath, ResolvedAudioUrl};
use narrator_playback::{
    Control, ControlEvent, Handler, LocalTask, MediaEvent, Platform, PlaybackError, Result,
};
use std::time::Duration;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Window};

pub struct WebPlatform {
    window: Window,
    document: Document,
}

impl WebPlatform {
    pub fn new() -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| PlaybackError::dom("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| PlaybackError::dom("window has no document"))?;
        Ok(Self { window, document })
    }
}

#[async_trait(?Send)]
impl Platform for WebPlatform {
    type Control = WebControl;
    type Media = WebMedia;
    type Listener = DomListener;
    type Observer = DomObserver;

    fn query(&self, selector: &str) -> Option<WebControl> {
        match self.document.query_selector(selector) {
            Ok(found) => found.map(WebControl::new),
            Err(e) => {
                tracing::warn!(selector, error = %describe(&e), "Invalid selector");
                None
            }
        }
    }

    fn traverse(&self, from: &WebControl, path: &ElementPath) -> Option<WebControl> {
        let mut element = from.element().clone();
        for _ in 0..path.up {
            element = element.parent_element()?;
        }
        for &index in &path.children {
            element = element.children().item(u32::try_from(index).ok()?)?;
        }
        Some(WebControl::new(element))
    }

    fn replace_with_clone(&self, control: &WebControl) -> Result<WebControl> {
        let original = control.element();
        if !control.is_connected() {
            return Err(PlaybackError::dom(format!(
                "<{}> is not in the document",
                original.tag_name()
            )));
        }

        let copy = original.clone_node_with_deep(true).map_err(js_error)?;
        original.replace_with_with_node_1(&copy).map_err(js_error)?;

        let copy = copy
            .dyn_into::<Element>()
            .map_err(|_| PlaybackError::dom("cloned node is not an element"))?;
        Ok(WebControl::new(copy))
    }

    fn listen(
        &self,
        control: &WebControl,
        event: ControlEvent,
        handler: Handler,
    ) -> Result<DomListener> {
        DomListener::attach(control.element(), event.as_str(), handler)
    }

    fn listen_media(
        &self,
        media: &WebMedia,
        event: MediaEvent,
        handler: Handler,
    ) -> Result<DomListener> {
        DomListener::attach(media.audio(), event.as_str(), handler)
    }

    fn location_href(&self) -> String {
        self.window.location().href().unwrap_or_default()
    }

    fn location_path(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    async fn load_media(&self, url: &ResolvedAudioUrl) -> Result<WebMedia> {
        WebMedia::load(url.as_str()).await
    }

    async fn sleep(&self, duration: Duration) {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis).await;
    }

    fn spawn(&self, task: LocalTask) {
        wasm_bindgen_futures::spawn_local(task);
    }

    fn observe_mutations(&self, callback: Handler) -> Result<DomObserver> {
        DomObserver::observe(&self.document, callback)
    }
}
