//! Scripture Narrator - Content Script
//!
//! Injected into the scripture reader's chapter pages. Takes over the
//! host's audio player so it plays chapter narration from the remote audio
//! store instead.
//!
//! This crate provides:
//! - `WebPlatform`: the playback `Platform` over `web-sys`
//! - Console logging for `tracing`
//! - The module start hook that boots the narrator
//!
//! # Configuration
//!
//! Defaults work out of the box. A page (or the extension's loader) may
//! define a global `NARRATOR_CONFIG` object before the module starts; its
//! fields override the defaults, e.g.
//! `{ "audio_base_url": "https://cdn.example/BOM", "log_level": "debug" }`.

mod dom;
mod listener;
mod logging;
mod media;
mod platform;

pub use dom::WebControl;
pub use listener::{DomListener, DomObserver};
pub use media::WebMedia;
pub use platform::WebPlatform;

use narrator_core::NarratorConfig;
use narrator_playback::Narrator;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Global object read for configuration overrides
const CONFIG_GLOBAL: &str = "NARRATOR_CONFIG";

thread_local! {
    static NARRATOR: RefCell<Option<Narrator<WebPlatform>>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config = read_config()?;
    logging::init(&config.log_level);

    let platform = Rc::new(WebPlatform::new().map_err(to_js_error)?);
    let narrator = Narrator::start(platform, config).map_err(to_js_error)?;
    NARRATOR.with(|slot| *slot.borrow_mut() = Some(narrator));

    Ok(())
}

/// Stop watching the page, cancel pending waits and release every intercept
#[wasm_bindgen(js_name = stopNarrator)]
pub fn stop() {
    let narrator = NARRATOR.with(|slot| slot.borrow_mut().take());
    if let Some(narrator) = narrator {
        drop(narrator);
        tracing::info!("Narrator stopped");
    }
}

fn read_config() -> Result<NarratorConfig, JsValue> {
    let value = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(CONFIG_GLOBAL))?;
    if value.is_undefined() || value.is_null() {
        return Ok(NarratorConfig::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(Into::into)
}

fn to_js_error(error: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&error.to_string()).into()
}
