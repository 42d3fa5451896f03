/// Narrator configuration
use crate::error::{NarratorError, Result};
use crate::resolver::AudioResolver;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NarratorConfig {
    #[serde(default = "default_audio_base_url")]
    pub audio_base_url: String,

    #[serde(default)]
    pub selectors: Selectors,

    #[serde(default)]
    pub progress_layout: ProgressLayout,

    #[serde(default)]
    pub timing: TimingSettings,

    #[serde(default)]
    pub labels: PlayLabels,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Attribute selectors for the host page's player controls
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Selectors {
    #[serde(default = "default_toggle_selector")]
    pub toggle: String,

    #[serde(default = "default_close_selector")]
    pub close: String,

    #[serde(default = "default_play_selector")]
    pub play: String,

    #[serde(default = "default_scrub_selector")]
    pub scrub: String,
}

/// Walk from one element to another: `up` parents, then child indexes
///
/// This is a contract with the host page's current markup. When the markup
/// changes the walk lands on nothing and the affected label stays untouched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ElementPath {
    pub up: usize,
    pub children: Vec<usize>,
}

impl ElementPath {
    pub fn new(up: usize, children: impl Into<Vec<usize>>) -> Self {
        Self {
            up,
            children: children.into(),
        }
    }
}

/// Where the progress elements sit relative to the scrub input
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProgressLayout {
    #[serde(default = "default_fill_path")]
    pub fill: ElementPath,

    #[serde(default = "default_elapsed_path")]
    pub elapsed_label: ElementPath,

    #[serde(default = "default_total_path")]
    pub total_label: ElementPath,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TimingSettings {
    /// Delay between element lookups while waiting for a control
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Give up waiting for a control after this long; `None` waits forever
    #[serde(default)]
    pub poll_timeout_ms: Option<u64>,

    /// Pause after a navigation before re-querying the host page
    #[serde(default = "default_settling_delay_ms")]
    pub settling_delay_ms: u64,
}

/// Accessible labels written to the play control
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayLabels {
    #[serde(default = "default_play_label")]
    pub play: String,

    #[serde(default = "default_pause_label")]
    pub pause: String,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            audio_base_url: default_audio_base_url(),
            selectors: Selectors::default(),
            progress_layout: ProgressLayout::default(),
            timing: TimingSettings::default(),
            labels: PlayLabels::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            toggle: default_toggle_selector(),
            close: default_close_selector(),
            play: default_play_selector(),
            scrub: default_scrub_selector(),
        }
    }
}

impl Default for ProgressLayout {
    fn default() -> Self {
        Self {
            fill: default_fill_path(),
            elapsed_label: default_elapsed_path(),
            total_label: default_total_path(),
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            poll_timeout_ms: None,
            settling_delay_ms: default_settling_delay_ms(),
        }
    }
}

impl Default for PlayLabels {
    fn default() -> Self {
        Self {
            play: default_play_label(),
            pause: default_pause_label(),
        }
    }
}

impl TimingSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn poll_timeout(&self) -> Option<Duration> {
        self.poll_timeout_ms.map(Duration::from_millis)
    }

    pub fn settling_delay(&self) -> Duration {
        Duration::from_millis(self.settling_delay_ms)
    }
}

impl NarratorConfig {
    /// Parse a JSON document, filling omitted fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        AudioResolver::new(&self.audio_base_url)?;

        if self.timing.poll_interval_ms == 0 {
            return Err(NarratorError::config("poll_interval_ms must be greater than zero"));
        }

        let selectors = [
            ("toggle", &self.selectors.toggle),
            ("close", &self.selectors.close),
            ("play", &self.selectors.play),
            ("scrub", &self.selectors.scrub),
        ];
        for (name, selector) in selectors {
            if selector.trim().is_empty() {
                return Err(NarratorError::config(format!("{name} selector is empty")));
            }
        }

        Ok(())
    }

    /// Build the path resolver for this configuration
    pub fn resolver(&self) -> Result<AudioResolver> {
        AudioResolver::new(&self.audio_base_url)
    }
}

fn default_audio_base_url() -> String {
    "https://masterofnone-dev.s3.us-west-2.amazonaws.com/BOM".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_toggle_selector() -> String {
    "button[aria-label='Audio Player']".to_string()
}

fn default_close_selector() -> String {
    "button[aria-label='Close Audio Player']".to_string()
}

fn default_play_selector() -> String {
    "button[data-testid='audio-player-play']".to_string()
}

fn default_scrub_selector() -> String {
    "input[aria-label='Percent Played']".to_string()
}

// <div>                    up 2
//   <span>00:00</span>     elapsed: child 0
//   <div>                  up 1
//     <div fill/>          fill: child 0
//     <input scrub/>
//   </div>
//   <span>00:00</span>     total: child 2
// </div>
fn default_fill_path() -> ElementPath {
    ElementPath::new(1, [0])
}

fn default_elapsed_path() -> ElementPath {
    ElementPath::new(2, [0])
}

fn default_total_path() -> ElementPath {
    ElementPath::new(2, [2])
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_settling_delay_ms() -> u64 {
    100
}

fn default_play_label() -> String {
    "Play".to_string()
}

fn default_pause_label() -> String {
    "Pause".to_string()
}
