//! Scripture volumes and their narration folders

use serde::{Deserialize, Serialize};
use std::fmt;

/// A book of the Book of Mormon as addressed by the host page
///
/// Each book has a short code (the path segment the host page uses) and a
/// canonical folder name in the remote audio store. The introductory
/// material has an empty code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Book {
    FirstNephi,
    SecondNephi,
    Jacob,
    Enos,
    Jarom,
    Omni,
    WordsOfMormon,
    Mosiah,
    Alma,
    Helaman,
    ThirdNephi,
    FourthNephi,
    Mormon,
    Ether,
    Moroni,
    Preface,
}

impl Book {
    /// Every known book, in folder order
    pub const ALL: [Book; 16] = [
        Book::FirstNephi,
        Book::SecondNephi,
        Book::Jacob,
        Book::Enos,
        Book::Jarom,
        Book::Omni,
        Book::WordsOfMormon,
        Book::Mosiah,
        Book::Alma,
        Book::Helaman,
        Book::ThirdNephi,
        Book::FourthNephi,
        Book::Mormon,
        Book::Ether,
        Book::Moroni,
        Book::Preface,
    ];

    /// Look up a book by its host-page code
    ///
    /// Returns `None` for codes outside the enumeration.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|book| book.code() == code)
    }

    /// Path segment used by the host page
    pub fn code(self) -> &'static str {
        match self {
            Book::FirstNephi => "1-ne",
            Book::SecondNephi => "2-ne",
            Book::Jacob => "jacob",
            Book::Enos => "enos",
            Book::Jarom => "jarom",
            Book::Omni => "omni",
            Book::WordsOfMormon => "w-of-m",
            Book::Mosiah => "mosiah",
            Book::Alma => "alma",
            Book::Helaman => "hel",
            Book::ThirdNephi => "3-ne",
            Book::FourthNephi => "4-ne",
            Book::Mormon => "morm",
            Book::Ether => "ether",
            Book::Moroni => "moro",
            Book::Preface => "",
        }
    }

    /// Folder name in the remote audio store
    pub fn folder(self) -> &'static str {
        match self {
            Book::FirstNephi => "00-1nephi",
            Book::SecondNephi => "01-2nephi",
            Book::Jacob => "02-jacob",
            Book::Enos => "03-enos",
            Book::Jarom => "04-jarom",
            Book::Omni => "05-omni",
            Book::WordsOfMormon => "06-wom",
            Book::Mosiah => "07-mosiah",
            Book::Alma => "08-alma",
            Book::Helaman => "09-helaman",
            Book::ThirdNephi => "10-3nephi",
            Book::FourthNephi => "11-4nephi",
            Book::Mormon => "12-mormon",
            Book::Ether => "13-ether",
            Book::Moroni => "14-moroni",
            Book::Preface => "15-preface",
        }
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder())
    }
}
