//! Scripture Narrator Core
//!
//! Platform-agnostic building blocks for the narration overlay.
//!
//! This crate provides:
//! - **Book enumeration**: scripture-volume codes and their audio folders
//! - **Path resolution**: host page path to remote audio URL
//! - **Time formatting**: seconds to `MM:SS` labels
//! - **Progress math**: elapsed/total labels and fill percentage
//! - **Configuration**: selectors, positional layout, timing, labels
//!
//! Nothing here touches the browser. The DOM binding lives in the
//! content-script application and talks to this crate through plain values.
//!
//! # Example
//!
//! ```rust
//! use narrator_core::{format_seconds, AudioResolver};
//!
//! let resolver = AudioResolver::new("https://audio.example.com/BOM").unwrap();
//! let url = resolver.resolve("/study/scriptures/bofm/1-ne/1").unwrap();
//! assert_eq!(url.as_str(), "https://audio.example.com/BOM/00-1nephi/1.mp3");
//!
//! assert_eq!(format_seconds(119.02), "01:59");
//! ```

#![forbid(unsafe_code)]

pub mod book;
pub mod config;
pub mod error;
pub mod progress;
pub mod resolver;
pub mod time;

pub use book::Book;
pub use config::{
    ElementPath, NarratorConfig, PlayLabels, ProgressLayout, Selectors, TimingSettings,
};
pub use error::{NarratorError, Result};
pub use progress::{seek_position, ProgressSnapshot};
pub use resolver::{parse_chapter_path, AudioResolver, ChapterRef, ResolvedAudioUrl};
pub use time::format_seconds;
