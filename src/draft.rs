//! Loading saved drafts into the editor.

use crate::api::{ApiClient, ApiError, Transport};
use crate::editor::{EditorBuffer, TextSurface};
use crate::selection::Selection;

/// The article editor form: a title input and the text field.
#[derive(Debug, Default)]
pub struct DraftForm {
    pub title: String,
    pub editor: EditorBuffer,
}

/// Replace the form's title and content with draft `selected`.
///
/// Does nothing when no draft is selected. On success the editor is
/// notified exactly once so the preview can refresh.
pub fn load_draft<T: Transport>(
    client: &ApiClient<T>,
    selected: Option<&str>,
    form: &mut DraftForm,
) -> Result<bool, ApiError> {
    let Some(id) = selected else {
        return Ok(false);
    };
    let draft = client.draft(id)?;
    tracing::debug!(id, title = %draft.title, "draft loaded");

    form.editor
        .set_text_and_selection(&draft.content, Selection::none(0));
    form.title = draft.title;
    form.editor.notify_changed();
    Ok(true)
}
