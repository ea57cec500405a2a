//! Selection ranges over editor text.
//!
//! Offsets follow the browser text-input model: they count UTF-16 code
//! units, not bytes or chars. The helpers here map those offsets onto
//! byte indices of a Rust `&str`.

use serde::{Deserialize, Serialize};

/// Which end of the selection the caret sits on.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
    /// No active selection.
    #[default]
    None,
}

/// A highlighted range in the editor, in UTF-16 code units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
    pub direction: Direction,
}

impl Selection {
    /// Create a selection. `start` and `end` are swapped if given in reverse.
    pub const fn new(start: usize, end: usize, direction: Direction) -> Self {
        if start <= end {
            Self {
                start,
                end,
                direction,
            }
        } else {
            Self {
                start: end,
                end: start,
                direction,
            }
        }
    }

    /// A forward selection from `start` to `end`.
    pub const fn forward(start: usize, end: usize) -> Self {
        Self::new(start, end, Direction::Forward)
    }

    /// A collapsed caret with no active selection.
    pub const fn none(at: usize) -> Self {
        Self::new(at, at, Direction::None)
    }

    /// Number of code units covered.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the surface reports an active selection.
    pub fn is_active(&self) -> bool {
        self.direction != Direction::None
    }
}

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.chars().map(char::len_utf16).sum()
}

/// Map a UTF-16 offset to a byte index into `text`.
///
/// An offset that falls between the two halves of a surrogate pair snaps
/// down to the start of that character; offsets past the end clamp to
/// `text.len()`.
pub fn utf16_to_byte(text: &str, offset: usize) -> usize {
    let mut units = 0;
    for (byte, ch) in text.char_indices() {
        let next = units + ch.len_utf16();
        if next > offset {
            return byte;
        }
        units = next;
    }
    text.len()
}
