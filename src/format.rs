//! Inline formatting toggles.
//!
//! A toolbar button wraps the selected text in a delimiter pair, or strips
//! the pair again when the selection already carries it:
//!
//! ```
//! use markpen::format::{Style, toggle_wrap};
//! use markpen::selection::Selection;
//!
//! let toggle = toggle_wrap("hello world", Selection::forward(0, 5), Style::Bold.delimiters());
//! assert_eq!(toggle.text(), Some("**hello** world"));
//! assert_eq!(toggle.selection(), Some(Selection::forward(0, 9)));
//! ```

use serde::Serialize;

use crate::selection::{Selection, utf16_len, utf16_to_byte};

/// Prefix and suffix marking up a span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters<'a> {
    pub prefix: &'a str,
    pub suffix: &'a str,
}

impl<'a> Delimiters<'a> {
    pub const fn new(prefix: &'a str, suffix: &'a str) -> Self {
        Self { prefix, suffix }
    }

    /// Same string on both sides.
    pub const fn symmetric(marker: &'a str) -> Self {
        Self::new(marker, marker)
    }
}

/// The formatting styles offered on the editor toolbar.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Bold,
    Emphasis,
    Underline,
    Strikethrough,
}

impl Style {
    pub const ALL: [Self; 4] = [
        Self::Bold,
        Self::Emphasis,
        Self::Underline,
        Self::Strikethrough,
    ];

    pub const fn delimiters(self) -> Delimiters<'static> {
        match self {
            Self::Bold => Delimiters::symmetric("**"),
            Self::Emphasis => Delimiters::symmetric("_"),
            Self::Underline => Delimiters::new("<u>", "</u>"),
            Self::Strikethrough => Delimiters::symmetric("~~"),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Emphasis => "emphasis",
            Self::Underline => "underline",
            Self::Strikethrough => "strikethrough",
        }
    }
}

/// Which of the four toggle branches produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Change {
    /// Both delimiters were present and removed.
    Unwrapped,
    /// Only the prefix was present and removed.
    StrippedPrefix,
    /// Only the suffix was present and removed.
    StrippedSuffix,
    /// Neither was present; the selection got wrapped.
    Wrapped,
}

/// Outcome of [`toggle_wrap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggle {
    Applied {
        text: String,
        selection: Selection,
        change: Change,
    },
    /// Nothing selected, nothing changed.
    NoOp,
}

impl Toggle {
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Applied { text, .. } => Some(text),
            Self::NoOp => None,
        }
    }

    pub const fn selection(&self) -> Option<Selection> {
        match self {
            Self::Applied { selection, .. } => Some(*selection),
            Self::NoOp => None,
        }
    }

    pub const fn change(&self) -> Option<Change> {
        match self {
            Self::Applied { change, .. } => Some(*change),
            Self::NoOp => None,
        }
    }
}

/// Toggle `delimiters` around the selected part of `text`.
///
/// The branches are checked in order: both delimiters present (strip both),
/// prefix only, suffix only, neither (wrap). The returned selection keeps
/// `start`, moves `end` by the number of UTF-16 units added or removed and
/// is always [`Direction::Forward`](crate::selection::Direction::Forward).
///
/// Stripping both delimiters from a selection shorter than the two of them
/// together takes the text between the prefix end and the suffix start in
/// whichever order they fall, so `"**"` stays `"**"` and `"***"` becomes
/// `"*"`. The selection end may then fall before its start, in which case the
/// start follows it down and both clamp at 0. A browser field would instead
/// read the negative end as a huge unsigned value and clamp it to the text
/// length; that is not reproduced.
///
/// Offsets past the end of `text` are clamped before anything is computed,
/// so the returned selection always lies inside the returned text.
pub fn toggle_wrap(text: &str, selection: Selection, delimiters: Delimiters<'_>) -> Toggle {
    if !selection.is_active() {
        return Toggle::NoOp;
    }

    let start = utf16_to_byte(text, selection.start);
    let end = utf16_to_byte(text, selection.end).max(start);
    let start_units = utf16_len(&text[..start]);
    let end_units = utf16_len(&text[..end]);
    let left = &text[..start];
    let middle = &text[start..end];
    let right = &text[end..];

    let Delimiters { prefix, suffix } = delimiters;
    let prefix_units = utf16_len(prefix);
    let suffix_units = utf16_len(suffix);

    let (change, content, new_end) = match (middle.starts_with(prefix), middle.ends_with(suffix)) {
        (true, true) => (
            Change::Unwrapped,
            between(middle, prefix.len(), middle.len() - suffix.len()).to_owned(),
            end_units.saturating_sub(prefix_units + suffix_units),
        ),
        (true, false) => (
            Change::StrippedPrefix,
            middle[prefix.len()..].to_owned(),
            end_units.saturating_sub(prefix_units),
        ),
        (false, true) => (
            Change::StrippedSuffix,
            middle[..middle.len() - suffix.len()].to_owned(),
            end_units.saturating_sub(suffix_units),
        ),
        (false, false) => (
            Change::Wrapped,
            format!("{prefix}{middle}{suffix}"),
            end_units + prefix_units + suffix_units,
        ),
    };

    tracing::debug!(
        ?change,
        start = start_units,
        end = end_units,
        new_end,
        "toggled {prefix:?}/{suffix:?}"
    );

    Toggle::Applied {
        text: format!("{left}{content}{right}"),
        selection: Selection::forward(start_units.min(new_end), new_end),
        change,
    }
}

/// What the CLI reports for a toggle: the applied result, or the input
/// echoed back unchanged with no `change` for a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToggleReport<'a> {
    pub text: &'a str,
    pub selection: Selection,
    pub change: Option<Change>,
}

impl<'a> ToggleReport<'a> {
    pub fn new(input: &'a str, selection: Selection, toggle: &'a Toggle) -> Self {
        match toggle {
            Toggle::Applied {
                text,
                selection,
                change,
            } => Self {
                text,
                selection: *selection,
                change: Some(*change),
            },
            Toggle::NoOp => Self {
                text: input,
                selection,
                change: None,
            },
        }
    }
}

/// Slice between two byte offsets taken in ascending order.
fn between(s: &str, a: usize, b: usize) -> &str {
    if a <= b { &s[a..b] } else { &s[b..a] }
}
