// ABOUTME: Class-membership selection and checkbox/dropdown state operations.
// ABOUTME: Every call re-resolves its container from the live document; nothing is cached.

//! Selection utilities over a caller-supplied document.
//!
//! These functions implement the console's bulk-selection behaviors:
//! finding elements by class marker, applying class toggles, checking a
//! percentage of a checkbox group, and moving dropdown selections.
//!
//! Key behaviors:
//! - Containers and forms are resolved fresh on every call; an unresolvable
//!   reference is a `NotFound` error, never a silent no-op.
//! - "Class membership" means the class list contains the token, matching
//!   the marker-class convention of the console pages.
//! - Checkbox state is the presence of the `checked` attribute; dropdown
//!   selection is the presence of `selected` on an option.

use dom_query::{Document, Selection};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ConsoleError, Result};
use crate::matchers;

/// The desired class-membership change for a set of elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Toggle {
    /// Ensure the class is present.
    Set,
    /// Ensure the class is absent.
    Clear,
    /// Invert membership per element, based on that element's own state.
    Flip,
}

impl fmt::Display for Toggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Toggle::Set => "set",
            Toggle::Clear => "clear",
            Toggle::Flip => "flip",
        };
        write!(f, "{}", s)
    }
}

/// Resolves a container selector to its first match in document order.
pub(crate) fn resolve_container<'a>(
    doc: &'a Document,
    selector: &str,
    op: &str,
) -> Result<Selection<'a>> {
    let matcher = matchers::compile(selector, op)?;
    doc.select_matcher(&matcher)
        .iter()
        .next()
        .ok_or_else(|| ConsoleError::not_found(selector, op, None))
}

/// Returns every descendant of `container` whose class list contains
/// `class_name`, in document order. When `include_container` is true and the
/// container itself carries the class, it leads the sequence.
///
/// An empty result is not an error; only an unresolvable container is.
pub fn class_members_of<'a>(
    doc: &'a Document,
    container: &str,
    class_name: &str,
    include_container: bool,
) -> Result<Vec<Selection<'a>>> {
    let root = resolve_container(doc, container, "ClassMembersOf")?;

    let mut members = Vec::new();
    if include_container && root.has_class(class_name) {
        members.push(root.clone());
    }
    for child in root.select_matcher(&matchers::ANY).iter() {
        if child.has_class(class_name) {
            members.push(child);
        }
    }
    Ok(members)
}

/// Applies a class-membership change to each element in the sequence.
///
/// `Flip` consults each element's own prior state, so a mixed sequence stays
/// mixed (inverted), it is not forced to a shared value.
pub fn apply_toggle(elements: &[Selection<'_>], instruction: Toggle, class_name: &str) {
    for el in elements {
        match instruction {
            Toggle::Set => el.add_class(class_name),
            Toggle::Clear => el.remove_class(class_name),
            Toggle::Flip => {
                if el.has_class(class_name) {
                    el.remove_class(class_name);
                } else {
                    el.add_class(class_name);
                }
            }
        }
    }
}

/// Checks the first `round(count * percentage / 100)` inputs carrying
/// `class_name` under `container`, clearing every other one.
///
/// The clear-all pass runs to completion before any re-checking, and the
/// checked subset is a prefix of the original document ordering. Returns the
/// number of inputs checked.
pub fn quick_select(
    doc: &Document,
    container: &str,
    class_name: &str,
    percentage: f64,
) -> Result<usize> {
    let root = resolve_container(doc, container, "QuickSelect")?;

    let inputs: Vec<Selection<'_>> = root
        .select_matcher(&matchers::INPUT)
        .iter()
        .filter(|input| input.has_class(class_name))
        .collect();

    for input in &inputs {
        input.remove_attr("checked");
    }

    // Round-half-up; a negative product saturates to zero on the cast.
    let take = (inputs.len() as f64 * percentage / 100.0).round() as usize;
    let take = take.min(inputs.len());

    for input in inputs.iter().take(take) {
        input.set_attr("checked", "checked");
    }
    Ok(take)
}

/// Checks exactly the first input carrying `class_name` under `container`
/// and unchecks every other, regardless of prior state. No-op when nothing
/// matches.
pub fn select_one(doc: &Document, container: &str, class_name: &str) -> Result<()> {
    let root = resolve_container(doc, container, "SelectOne")?;

    let mut first_checked = false;
    for input in root.select_matcher(&matchers::INPUT).iter() {
        if !input.has_class(class_name) {
            continue;
        }
        if first_checked {
            input.remove_attr("checked");
        } else {
            input.set_attr("checked", "checked");
            first_checked = true;
        }
    }
    Ok(())
}

/// Moves every single-selection dropdown in `form` to its first option whose
/// value equals `value`; dropdowns with no matching option are left alone.
///
/// The return value reflects only the LAST dropdown examined, not all of
/// them. Callers wanting "did any dropdown match" must not rely on it; the
/// contract is kept as-is for compatibility with existing callers.
pub fn set_default_in_form_selects(doc: &Document, form: &str, value: &str) -> Result<bool> {
    let root = resolve_container(doc, form, "SetFormSelects")?;

    let mut last_matched = false;
    for select in root.select_matcher(&matchers::SELECT).iter() {
        if select.attr("multiple").is_some() {
            continue;
        }

        let options: Vec<Selection<'_>> = select.select_matcher(&matchers::OPTION).iter().collect();
        let hit = options.iter().position(|opt| option_value(opt) == value);
        last_matched = hit.is_some();

        if let Some(idx) = hit {
            for (i, option) in options.iter().enumerate() {
                if i == idx {
                    option.set_attr("selected", "selected");
                } else {
                    option.remove_attr("selected");
                }
            }
        }
    }
    Ok(last_matched)
}

/// An option's value: its `value` attribute, falling back to its trimmed
/// text content (standard `option.value` behavior).
pub(crate) fn option_value(option: &Selection<'_>) -> String {
    match option.attr("value") {
        Some(v) => v.to_string(),
        None => option.text().trim().to_string(),
    }
}

/// Whether an input carries the `checked` attribute.
pub(crate) fn is_checked(input: &Selection<'_>) -> bool {
    input.attr("checked").is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn checkbox_doc() -> Document {
        Document::from(
            r#"
            <div id="steps">
                <input type="checkbox" class="stepCheckBox" value="s1">
                <input type="checkbox" class="stepCheckBox" value="s2" checked>
                <input type="checkbox" class="other" value="x1">
                <input type="checkbox" class="stepCheckBox" value="s3">
                <input type="checkbox" class="stepCheckBox" value="s4">
            </div>
        "#,
        )
    }

    fn checked_values(doc: &Document, class_name: &str) -> Vec<String> {
        doc.select_matcher(&matchers::INPUT)
            .iter()
            .filter(|i| i.has_class(class_name) && is_checked(i))
            .map(|i| i.attr("value").map(|v| v.to_string()).unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_class_members_of_orders_and_filters() {
        let doc = Document::from(
            r#"
            <div id="root" class="mark">
                <p class="mark">a</p>
                <p>b</p>
                <span><em class="mark">c</em></span>
            </div>
        "#,
        );

        let members = class_members_of(&doc, "#root", "mark", true).unwrap();
        assert_eq!(members.len(), 3);

        let texts: Vec<String> = members.iter().map(|m| m.text().trim().to_string()).collect();
        // Container leads, then descendants in document order
        assert_eq!(texts[1], "a");
        assert_eq!(texts[2], "c");
    }

    #[test]
    fn test_class_members_of_excludes_container_when_asked() {
        let doc = Document::from(r#"<div id="root" class="mark"><p class="mark">a</p></div>"#);
        let members = class_members_of(&doc, "#root", "mark", false).unwrap();
        assert_eq!(members.len(), 1);
    }

    #[test]
    fn test_class_members_of_empty_is_ok() {
        let doc = Document::from(r#"<div id="root"><p>a</p></div>"#);
        let members = class_members_of(&doc, "#root", "mark", true).unwrap();
        assert!(members.is_empty());
    }

    #[test]
    fn test_class_members_of_missing_container_errors() {
        let doc = Document::from("<div></div>");
        let err = class_members_of(&doc, "#nope", "mark", true).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_apply_toggle_set_clear() {
        let doc = Document::from(r#"<div id="r"><p class="m">a</p><p class="m hidden">b</p></div>"#);
        let members = class_members_of(&doc, "#r", "m", false).unwrap();

        apply_toggle(&members, Toggle::Set, "hidden");
        assert!(members.iter().all(|m| m.has_class("hidden")));

        apply_toggle(&members, Toggle::Clear, "hidden");
        assert!(members.iter().all(|m| !m.has_class("hidden")));
    }

    #[test]
    fn test_apply_toggle_flip_is_per_element() {
        let doc = Document::from(r#"<div id="r"><p class="m">a</p><p class="m hidden">b</p></div>"#);
        let members = class_members_of(&doc, "#r", "m", false).unwrap();

        apply_toggle(&members, Toggle::Flip, "hidden");
        // The previously-bare element gained the class, the other lost it
        assert!(members[0].has_class("hidden"));
        assert!(!members[1].has_class("hidden"));
    }

    #[test]
    fn test_quick_select_half() {
        let doc = checkbox_doc();
        let checked = quick_select(&doc, "#steps", "stepCheckBox", 50.0).unwrap();
        assert_eq!(checked, 2);
        assert_eq!(checked_values(&doc, "stepCheckBox"), vec!["s1", "s2"]);
        // The non-matching input is untouched
        assert_eq!(checked_values(&doc, "other"), Vec::<String>::new());
    }

    #[test]
    fn test_quick_select_zero_clears_all() {
        let doc = checkbox_doc();
        let checked = quick_select(&doc, "#steps", "stepCheckBox", 0.0).unwrap();
        assert_eq!(checked, 0);
        assert_eq!(checked_values(&doc, "stepCheckBox"), Vec::<String>::new());
    }

    #[test]
    fn test_quick_select_full_and_beyond() {
        let doc = checkbox_doc();
        assert_eq!(quick_select(&doc, "#steps", "stepCheckBox", 100.0).unwrap(), 4);
        assert_eq!(quick_select(&doc, "#steps", "stepCheckBox", 150.0).unwrap(), 4);
    }

    #[test]
    fn test_quick_select_rounds_half_up() {
        // 4 * 37.5% = 1.5, rounds to 2
        let doc = checkbox_doc();
        assert_eq!(quick_select(&doc, "#steps", "stepCheckBox", 37.5).unwrap(), 2);
    }

    #[test]
    fn test_select_one_resets_prior_state() {
        let doc = Document::from(
            r#"
            <div id="plans">
                <input type="radio" class="plan" value="p1">
                <input type="radio" class="plan" value="p2">
                <input type="radio" class="plan" value="p3" checked>
                <input type="radio" class="plan" value="p4">
                <input type="radio" class="plan" value="p5">
            </div>
        "#,
        );

        select_one(&doc, "#plans", "plan").unwrap();
        assert_eq!(checked_values(&doc, "plan"), vec!["p1"]);
    }

    #[test]
    fn test_select_one_no_matches_is_noop() {
        let doc = Document::from(r#"<div id="plans"><input class="other"></div>"#);
        select_one(&doc, "#plans", "plan").unwrap();
        assert_eq!(checked_values(&doc, "other"), Vec::<String>::new());
    }

    #[test]
    fn test_set_default_moves_selection() {
        let doc = Document::from(
            r#"
            <form id="f">
                <select name="env">
                    <option value="dev" selected>dev</option>
                    <option value="prod">prod</option>
                </select>
            </form>
        "#,
        );

        let matched = set_default_in_form_selects(&doc, "#f", "prod").unwrap();
        assert!(matched);

        let selected: Vec<String> = doc
            .select_matcher(&matchers::OPTION)
            .iter()
            .filter(|o| o.attr("selected").is_some())
            .map(|o| option_value(&o))
            .collect();
        assert_eq!(selected, vec!["prod"]);
    }

    #[test]
    fn test_set_default_leaves_unmatched_dropdown_alone() {
        let doc = Document::from(
            r#"
            <form id="f">
                <select name="env">
                    <option value="dev" selected>dev</option>
                    <option value="qa">qa</option>
                </select>
            </form>
        "#,
        );

        let matched = set_default_in_form_selects(&doc, "#f", "prod").unwrap();
        assert!(!matched);

        let selected: Vec<String> = doc
            .select_matcher(&matchers::OPTION)
            .iter()
            .filter(|o| o.attr("selected").is_some())
            .map(|o| option_value(&o))
            .collect();
        assert_eq!(selected, vec!["dev"]);
    }

    #[test]
    fn test_set_default_skips_multi_selects() {
        let doc = Document::from(
            r#"
            <form id="f">
                <select name="tags" multiple>
                    <option value="prod">prod</option>
                </select>
            </form>
        "#,
        );

        // The only dropdown is multi-select, so nothing is examined
        let matched = set_default_in_form_selects(&doc, "#f", "prod").unwrap();
        assert!(!matched);
    }

    // The return value tracks only the last dropdown examined. This is a
    // known weak contract, kept as-is; this test pins it so a change is
    // deliberate rather than accidental.
    #[test]
    fn test_set_default_return_reflects_last_dropdown_only() {
        let doc = Document::from(
            r#"
            <form id="f">
                <select name="a">
                    <option value="prod">prod</option>
                </select>
                <select name="b">
                    <option value="dev">dev</option>
                </select>
            </form>
        "#,
        );

        // "a" matches but "b" (examined last) does not, so the result is false.
        let matched = set_default_in_form_selects(&doc, "#f", "prod").unwrap();
        assert!(!matched);
    }

    #[test]
    fn test_option_value_falls_back_to_text() {
        let doc = Document::from(
            r#"
            <form id="f">
                <select name="env">
                    <option>dev</option>
                    <option>prod</option>
                </select>
            </form>
        "#,
        );

        let matched = set_default_in_form_selects(&doc, "#f", "prod").unwrap();
        assert!(matched);
    }
}
