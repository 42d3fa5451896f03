//! Host page elements

use narrator_playback::{Control, PlaybackError, Result};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement, HtmlInputElement};

/// A host page element seen through the [`Control`] trait
#[derive(Debug, Clone)]
pub struct WebControl {
    element: Element,
}

impl WebControl {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl Control for WebControl {
    fn set_disabled(&self, disabled: bool) {
        if let Err(e) = self.element.toggle_attribute_with_force("disabled", disabled) {
            tracing::debug!(error = %describe(&e), "Could not toggle disabled");
        }
    }

    fn is_disabled(&self) -> bool {
        self.element.has_attribute("disabled")
    }

    fn is_connected(&self) -> bool {
        self.element.is_connected()
    }

    fn set_text(&self, text: &str) {
        self.element.set_text_content(Some(text));
    }

    fn set_style(&self, property: &str, value: &str) -> Result<()> {
        let html = self
            .element
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| PlaybackError::dom(format!("<{}> has no style", self.element.tag_name())))?;
        html.style().set_property(property, value).map_err(js_error)
    }

    fn set_value(&self, value: &str) {
        match self.element.dyn_ref::<HtmlInputElement>() {
            Some(input) => input.set_value(value),
            None => {
                if let Err(e) = self.element.set_attribute("value", value) {
                    tracing::debug!(error = %describe(&e), "Could not set value");
                }
            }
        }
    }

    fn value(&self) -> String {
        match self.element.dyn_ref::<HtmlInputElement>() {
            Some(input) => input.value(),
            None => self.element.get_attribute("value").unwrap_or_default(),
        }
    }

    fn set_attribute(&self, name: &str, value: &str) -> Result<()> {
        self.element.set_attribute(name, value).map_err(js_error)
    }
}

/// Readable text for a thrown JS value
pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{value:?}")
}

pub(crate) fn js_error(value: JsValue) -> PlaybackError {
    PlaybackError::dom(describe(&value))
}
