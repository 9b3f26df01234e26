// ABOUTME: Show/hide conveniences built on the hidden marker class.
// ABOUTME: Thin compositions of class_members_of and apply_toggle.

use dom_query::Document;

use crate::error::Result;
use crate::selection::{apply_toggle, class_members_of, is_checked, resolve_container, Toggle};

/// The marker class the console stylesheet hides.
pub const HIDDEN_CLASS: &str = "hidden";

/// Flips the hidden class on the first element matching `target`.
pub fn toggle_show_hide(doc: &Document, target: &str) -> Result<()> {
    let el = resolve_container(doc, target, "ToggleShowHide")?;
    apply_toggle(&[el], Toggle::Flip, HIDDEN_CLASS);
    Ok(())
}

/// Hides the element matching `target`.
pub fn hide(doc: &Document, target: &str) -> Result<()> {
    let el = resolve_container(doc, target, "Hide")?;
    apply_toggle(&[el], Toggle::Set, HIDDEN_CLASS);
    Ok(())
}

/// Shows the element matching `target`.
pub fn show(doc: &Document, target: &str) -> Result<()> {
    let el = resolve_container(doc, target, "Show")?;
    apply_toggle(&[el], Toggle::Clear, HIDDEN_CLASS);
    Ok(())
}

/// Applies `instruction` for `class_name` to the container and every
/// descendant carrying `selection_class`.
pub fn toggle_class_children(
    doc: &Document,
    container: &str,
    selection_class: &str,
    instruction: Toggle,
    class_name: &str,
) -> Result<()> {
    let members = class_members_of(doc, container, selection_class, true)?;
    apply_toggle(&members, instruction, class_name);
    Ok(())
}

/// Shows or hides a rendered column: elements under `content` carrying the
/// column's class follow the checkbox whose id is the column name (checked
/// means visible).
pub fn show_hide_column(doc: &Document, content: &str, column: &str) -> Result<()> {
    let checkbox = resolve_container(doc, &format!("#{}", column), "ShowHideColumn")?;
    let instruction = if is_checked(&checkbox) {
        Toggle::Clear
    } else {
        Toggle::Set
    };
    toggle_class_children(doc, content, column, instruction, HIDDEN_CLASS)
}
