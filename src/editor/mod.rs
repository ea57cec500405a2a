//! The editor text field and its formatting toolbar.
//!
//! [`TextSurface`] is the contract a text-input widget offers; a browser
//! textarea, a TUI widget or the rope-backed [`EditorBuffer`] can all sit
//! behind it. The toolbar entry points run the formatting engine against a
//! surface and write the result back.

mod buffer;

pub use buffer::EditorBuffer;

use crate::format::{Delimiters, Style, Toggle, toggle_wrap};
use crate::selection::Selection;

/// A text-input surface the formatting toolbar can drive.
pub trait TextSurface {
    /// Full current content.
    fn text(&self) -> String;

    /// Current selection, in UTF-16 code units.
    fn selection(&self) -> Selection;

    /// Replace the whole content and reset the selection.
    fn set_text_and_selection(&mut self, text: &str, selection: Selection);

    /// Tell dependent views the content was replaced programmatically.
    fn notify_changed(&mut self);
}

/// Toggle `style` on the surface's selection.
///
/// Returns `true` if the surface was changed (and notified once).
pub fn apply_style<S: TextSurface + ?Sized>(surface: &mut S, style: Style) -> bool {
    apply_delimiters(surface, style.delimiters())
}

/// Toggle an arbitrary delimiter pair on the surface's selection.
pub fn apply_delimiters<S: TextSurface + ?Sized>(
    surface: &mut S,
    delimiters: Delimiters<'_>,
) -> bool {
    let text = surface.text();
    match toggle_wrap(&text, surface.selection(), delimiters) {
        Toggle::Applied {
            text, selection, ..
        } => {
            surface.set_text_and_selection(&text, selection);
            surface.notify_changed();
            true
        }
        Toggle::NoOp => false,
    }
}
