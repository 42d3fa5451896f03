//! Narration audio backed by `HTMLAudioElement`

use crate::dom::{describe, js_error};
use js_sys::Promise;
use narrator_playback::{Media, PlaybackError, Result};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlAudioElement;

#[derive(Debug, Clone)]
pub struct WebMedia {
    audio: HtmlAudioElement,
}

impl WebMedia {
    /// Create an audio element for `url` and wait for `canplay`
    ///
    /// An `error` event before `canplay` rejects the load.
    pub async fn load(url: &str) -> Result<Self> {
        let audio = HtmlAudioElement::new_with_src(url).map_err(js_error)?;
        audio.set_preload("auto");

        let ready = Promise::new(&mut |resolve, reject| {
            audio.set_oncanplay(Some(&resolve));
            audio.set_onerror(Some(&reject));
        });
        let outcome = JsFuture::from(ready).await;

        audio.set_oncanplay(None);
        audio.set_onerror(None);

        match outcome {
            Ok(_) => Ok(Self { audio }),
            Err(_) => {
                let reason = audio.error().map_or_else(
                    || "unknown error".to_string(),
                    |error| {
                        let message = error.message();
                        if message.is_empty() {
                            media_error_reason(error.code()).to_string()
                        } else {
                            format!("{}: {message}", media_error_reason(error.code()))
                        }
                    },
                );
                Err(PlaybackError::load_failed(url, reason))
            }
        }
    }

    pub fn audio(&self) -> &HtmlAudioElement {
        &self.audio
    }
}

impl Media for WebMedia {
    fn play(&self) {
        match self.audio.play() {
            Ok(started) => wasm_bindgen_futures::spawn_local(async move {
                if let Err(e) = JsFuture::from(started).await {
                    tracing::warn!(error = %describe(&e), "Browser refused playback");
                }
            }),
            Err(e) => tracing::warn!(error = %describe(&e), "Browser refused playback"),
        }
    }

    fn pause(&self) {
        if let Err(e) = self.audio.pause() {
            tracing::debug!(error = %describe(&e), "Pause failed");
        }
    }

    fn is_paused(&self) -> bool {
        self.audio.paused()
    }

    fn current_time(&self) -> f64 {
        self.audio.current_time()
    }

    fn set_current_time(&self, seconds: f64) {
        self.audio.set_current_time(seconds);
    }

    fn duration(&self) -> f64 {
        self.audio.duration()
    }

    fn source(&self) -> String {
        self.audio.src()
    }
}

/// `MediaError.code` as text
fn media_error_reason(code: u16) -> &'static str {
    match code {
        1 => "fetch aborted",
        2 => "network error",
        3 => "decode error",
        4 => "source not supported",
        _ => "unknown error",
    }
}
