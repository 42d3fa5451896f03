//! Progress reflection onto the host's scrub bar and time labels

use crate::platform::Control;
use narrator_core::ProgressSnapshot;

/// The host elements that display playback progress
///
/// Only the scrub input is guaranteed; the fill and labels are found by
/// positional traversal and may be missing if the host markup changed.
#[derive(Clone)]
pub struct ProgressView<C: Control> {
    pub scrub: C,
    pub fill: Option<C>,
    pub elapsed: Option<C>,
    pub total: Option<C>,
}

impl<C: Control> ProgressView<C> {
    pub fn render(&self, snapshot: &ProgressSnapshot) {
        self.scrub.set_value(&snapshot.input_value());

        if let Some(fill) = &self.fill {
            if let Err(e) = fill.set_style("width", &snapshot.fill_width()) {
                tracing::debug!(error = %e, "Could not size progress fill");
            }
        }
        if let Some(label) = &self.elapsed {
            label.set_text(&snapshot.elapsed);
        }
        if let Some(label) = &self.total {
            label.set_text(&snapshot.total);
        }
    }
}
