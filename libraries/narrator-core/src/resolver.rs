//! Host page path to narration URL
//!
//! The host page addresses chapters as `.../bofm/<book-code>/<chapter>`.
//! A path only resolves when it ends in that shape AND the book code is part
//! of the [`Book`] enumeration; everything else is a miss (`None`), never a
//! half-built URL. Chapter numbers are passed through as-is: whether the
//! remote file exists is only discovered when the audio loads.

use crate::book::Book;
use crate::error::{NarratorError, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// `bofm/<code>/<digits>` at the end of the path, optional trailing slash.
/// The code may be empty (preface).
static CHAPTER_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/bofm/([0-9A-Za-z-]*)/([0-9]+)/?$").unwrap()
});

/// A book and chapter parsed from the host page path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterRef {
    pub book: Book,
    pub chapter: u32,
}

/// Parse the book and chapter out of a host page path
///
/// Returns `None` when the path has no trailing chapter segment, when the
/// book code is unknown, or when the chapter does not fit in a `u32`.
pub fn parse_chapter_path(path: &str) -> Option<ChapterRef> {
    let captures = CHAPTER_PATH_RE.captures(path)?;
    let book = Book::from_code(&captures[1])?;
    let chapter = captures[2].parse().ok()?;
    Some(ChapterRef { book, chapter })
}

/// Fully-qualified narration URL for one chapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAudioUrl {
    url: Url,
    chapter: ChapterRef,
}

impl ResolvedAudioUrl {
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn chapter(&self) -> ChapterRef {
        self.chapter
    }
}

impl fmt::Display for ResolvedAudioUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// Maps host page paths to `<base>/<folder>/<chapter>.mp3`
#[derive(Debug, Clone)]
pub struct AudioResolver {
    base: Url,
}

impl AudioResolver {
    /// Create a resolver rooted at `base_url`
    ///
    /// The base must be an absolute URL that can carry path segments.
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(NarratorError::config(format!(
                "audio base URL cannot carry path segments: {base_url}"
            )));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Resolve a host page path, or `None` when it names no known chapter
    pub fn resolve(&self, path: &str) -> Option<ResolvedAudioUrl> {
        let Some(chapter) = parse_chapter_path(path) else {
            tracing::debug!(path, "Path does not name a known chapter");
            return None;
        };

        let mut url = self.base.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .push(chapter.book.folder())
            .push(&format!("{}.mp3", chapter.chapter));

        tracing::debug!(
            path,
            book = chapter.book.code(),
            chapter = chapter.chapter,
            folder = chapter.book.folder(),
            url = %url,
            "Resolved narration URL"
        );

        Some(ResolvedAudioUrl { url, chapter })
    }
}
