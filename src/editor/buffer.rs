use ropey::Rope;

use super::TextSurface;
use crate::selection::Selection;

/// An editor text field backed by a rope.
///
/// Holds the field content, the current selection in UTF-16 code units and
/// a count of change notifications, so callers can tell when dependent views
/// (such as a preview pane) need refreshing.
pub struct EditorBuffer {
    rope: Rope,
    selection: Selection,
    dirty: bool,
    revision: u64,
}

impl EditorBuffer {
    /// Create a new buffer from a string, with the caret at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: Selection::none(0),
            dirty: false,
            revision: 0,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Number of change notifications emitted so far.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// Length of the content in UTF-16 code units.
    pub fn len_utf16(&self) -> usize {
        self.rope.len_utf16_cu()
    }

    /// The currently selected text.
    pub fn selected_text(&self) -> String {
        let start = self.rope.utf16_cu_to_char(self.selection.start);
        let end = self.rope.utf16_cu_to_char(self.selection.end);
        self.rope.slice(start..end).to_string()
    }

    /// Select a range, clamped to the buffer.
    pub fn select(&mut self, selection: Selection) {
        self.selection = self.clamp(selection);
    }

    /// Replace the selection with `s`, leaving a collapsed caret after it.
    ///
    /// This is user typing: it marks the buffer dirty and notifies.
    pub fn insert_str(&mut self, s: &str) {
        let start = self.rope.utf16_cu_to_char(self.selection.start);
        let end = self.rope.utf16_cu_to_char(self.selection.end);
        self.rope.remove(start..end);
        self.rope.insert(start, s);
        let caret = self.rope.char_to_utf16_cu(start + s.chars().count());
        self.selection = Selection::none(caret);
        self.dirty = true;
        self.notify_changed();
    }

    fn clamp(&self, selection: Selection) -> Selection {
        let len = self.len_utf16();
        Selection::new(
            selection.start.min(len),
            selection.end.min(len),
            selection.direction,
        )
    }
}

impl TextSurface for EditorBuffer {
    fn text(&self) -> String {
        self.rope.to_string()
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn set_text_and_selection(&mut self, text: &str, selection: Selection) {
        self.rope = Rope::from_str(text);
        self.selection = self.clamp(selection);
        self.dirty = true;
    }

    fn notify_changed(&mut self) {
        self.revision += 1;
        tracing::trace!(revision = self.revision, "editor content changed");
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("selection", &self.selection)
            .field("dirty", &self.dirty)
            .field("revision", &self.revision)
            .finish()
    }
}

impl From<&str> for EditorBuffer {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Direction;

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = EditorBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
    }

    #[test]
    fn test_from_text_preserves_content() {
        let buf = EditorBuffer::from_text("hello\nworld");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(1), Some("world".to_string()));
        assert_eq!(buf.text(), "hello\nworld");
    }

    #[test]
    fn test_line_at_out_of_bounds_returns_none() {
        let buf = EditorBuffer::from_text("hello");
        assert_eq!(buf.line_at(1), None);
    }

    #[test]
    fn test_starts_without_selection() {
        let buf = EditorBuffer::from_text("hello");
        assert_eq!(buf.selection(), Selection::none(0));
        assert!(!buf.is_dirty());
        assert_eq!(buf.revision(), 0);
    }

    // --- Selection ---

    #[test]
    fn test_select_clamps_to_length() {
        let mut buf = EditorBuffer::from_text("abc");
        buf.select(Selection::forward(1, 99));
        assert_eq!(buf.selection(), Selection::forward(1, 3));
    }

    #[test]
    fn test_selected_text_uses_utf16_offsets() {
        let mut buf = EditorBuffer::from_text("😀 grün");
        buf.select(Selection::forward(3, 7));
        assert_eq!(buf.selected_text(), "grün");
        assert_eq!(buf.len_utf16(), 7);
    }

    // --- Editing ---

    #[test]
    fn test_insert_str_replaces_selection() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.select(Selection::forward(6, 11));
        buf.insert_str("there");
        assert_eq!(buf.text(), "hello there");
        assert_eq!(buf.selection(), Selection::none(11));
        assert_eq!(buf.selection().direction, Direction::None);
        assert!(buf.is_dirty());
        assert_eq!(buf.revision(), 1);
    }

    #[test]
    fn test_insert_multibyte_moves_caret_in_utf16_units() {
        let mut buf = EditorBuffer::from_text("ab");
        buf.select(Selection::none(1));
        buf.insert_str("😀");
        assert_eq!(buf.text(), "a😀b");
        assert_eq!(buf.selection(), Selection::none(3));
    }

    #[test]
    fn test_set_text_does_not_notify_by_itself() {
        let mut buf = EditorBuffer::from_text("old");
        buf.set_text_and_selection("new text", Selection::forward(0, 3));
        assert_eq!(buf.text(), "new text");
        assert_eq!(buf.revision(), 0);
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_mark_clean_resets_dirty() {
        let mut buf = EditorBuffer::from_text("x");
        buf.insert_str("y");
        buf.mark_clean();
        assert!(!buf.is_dirty());
    }
}
