// ABOUTME: Main library entry point for the Deckhand console DOM utilities.
// ABOUTME: Re-exports the public API: selection ops, visibility helpers, render params, preview client, encoding.

//! Deckhand - DOM utilities backing an administrative deployment console.
//!
//! This crate provides the console's selection and visibility operations
//! over a caller-supplied document, assembles the delta-view render
//! parameters, and refreshes the plan preview panel from its endpoint.
//!
//! # Example
//!
//! ```
//! use deckhand_console::{quick_select, ConsoleError};
//! use dom_query::Document;
//!
//! fn main() -> Result<(), ConsoleError> {
//!     let doc = Document::from(
//!         r#"<div id="steps">
//!             <input type="checkbox" class="stepCheckBox">
//!             <input type="checkbox" class="stepCheckBox">
//!         </div>"#,
//!     );
//!     let checked = quick_select(&doc, "#steps", "stepCheckBox", 50.0)?;
//!     assert_eq!(checked, 1);
//!     Ok(())
//! }
//! ```

pub mod encode;
pub mod error;
mod matchers;
pub mod params;
pub mod preview;
pub mod selection;
pub mod visibility;

pub use crate::encode::encode_as_html;
pub use crate::error::{ConsoleError, ErrorCode, Result};
pub use crate::params::{build_render_params, RenderControls};
pub use crate::preview::{preview_html, ClientBuilder, Options, PreviewClient, RefreshOutcome};
pub use crate::selection::{
    apply_toggle, class_members_of, quick_select, select_one, set_default_in_form_selects, Toggle,
};
pub use crate::visibility::{
    hide, show, show_hide_column, toggle_class_children, toggle_show_hide, HIDDEN_CLASS,
};
