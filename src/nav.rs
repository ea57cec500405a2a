//! Sidebar navigation toggle.

use crate::l10n::LabelCache;

/// Width the sidebar shrinks to when collapsed.
pub const DEFAULT_COLLAPSED_WIDTH: &str = "10px";

/// Label shown on the toggle while the sidebar is expanded.
pub const HIDE_LABEL: &str = "hide";
/// Label shown on the toggle while the sidebar is collapsed.
pub const SHOW_LABEL: &str = "show";

/// What the view should do after a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavChange {
    /// New CSS width for the sidebar.
    pub width: String,
    /// Label key for the toggle button.
    pub label_key: &'static str,
}

/// Collapse state of the sidebar, remembering the width to restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavToggle {
    hidden: bool,
    saved_width: String,
    collapsed_width: String,
}

impl NavToggle {
    pub fn new() -> Self {
        Self::with_collapsed_width(DEFAULT_COLLAPSED_WIDTH)
    }

    pub fn with_collapsed_width(width: impl Into<String>) -> Self {
        Self {
            hidden: false,
            saved_width: String::new(),
            collapsed_width: width.into(),
        }
    }

    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Flip the sidebar. `current_width` is its width right now.
    pub fn toggle(&mut self, current_width: &str) -> NavChange {
        if self.hidden {
            self.hidden = false;
            NavChange {
                width: self.saved_width.clone(),
                label_key: HIDE_LABEL,
            }
        } else {
            self.saved_width = current_width.to_string();
            self.hidden = true;
            NavChange {
                width: self.collapsed_width.clone(),
                label_key: SHOW_LABEL,
            }
        }
    }

    /// Flip the sidebar and resolve the button label through `labels`.
    pub fn toggle_labeled<F, E>(
        &mut self,
        current_width: &str,
        labels: &LabelCache,
        fetch: F,
    ) -> Result<(NavChange, String), E>
    where
        F: FnOnce(&str) -> Result<String, E>,
    {
        let change = self.toggle(current_width);
        let label = labels.label(change.label_key, fetch)?;
        Ok((change, label))
    }
}

impl Default for NavToggle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_remembers_width() {
        let mut nav = NavToggle::new();
        let change = nav.toggle("240px");
        assert!(nav.is_hidden());
        assert_eq!(change.width, "10px");
        assert_eq!(change.label_key, SHOW_LABEL);

        let change = nav.toggle("10px");
        assert!(!nav.is_hidden());
        assert_eq!(change.width, "240px");
        assert_eq!(change.label_key, HIDE_LABEL);
    }

    #[test]
    fn test_custom_collapsed_width() {
        let mut nav = NavToggle::with_collapsed_width("0");
        assert_eq!(nav.toggle("20%").width, "0");
    }

    #[test]
    fn test_toggle_labeled_uses_cache() {
        let labels = LabelCache::new();
        let mut nav = NavToggle::new();
        let (_, label) = nav
            .toggle_labeled("200px", &labels, |key| Ok::<_, ()>(format!("[{key}]")))
            .unwrap();
        assert_eq!(label, "[show]");

        nav.toggle("10px");
        let (change, label) = nav
            .toggle_labeled("200px", &labels, |_| -> Result<String, ()> {
                panic!("show label is cached")
            })
            .unwrap();
        assert_eq!(change.label_key, SHOW_LABEL);
        assert_eq!(label, "[show]");
    }
}
