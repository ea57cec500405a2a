// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. editor::EditorBuffer)
    clippy::module_name_repetitions
)]

//! # Markpen
//!
//! Editor-side core of a markdown drafting front-end.
//!
//! The centrepiece is the inline formatting toggle: select text, press
//! bold/emphasis/underline/strikethrough, and the matching delimiter pair is
//! wrapped around the selection or stripped from it again. Around it sits the
//! small amount of client glue the editor page needs.
//!
//! ## Modules
//!
//! - [`selection`]: UTF-16 selection ranges
//! - [`format`]: Delimiter wrap/unwrap engine
//! - [`editor`]: Text surface contract and rope-backed buffer
//! - [`api`]: JSON endpoint payloads and client
//! - [`draft`]: Loading drafts into the editor
//! - [`upload`]: Resource upload bodies
//! - [`l10n`]: Single-flight label cache
//! - [`nav`]: Sidebar collapse toggle
//! - [`consent`]: Cookie-consent notice
//! - [`config`]: Flag-file defaults

pub mod api;
pub mod config;
pub mod consent;
pub mod draft;
pub mod editor;
pub mod format;
pub mod l10n;
pub mod nav;
pub mod selection;
pub mod upload;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::editor::{EditorBuffer, TextSurface, apply_style};
    pub use crate::format::{Delimiters, Style, Toggle, toggle_wrap};
    pub use crate::selection::{Direction, Selection};
}
