// ABOUTME: Render-parameter assembly for the delta view refresh request.
// ABOUTME: Serializes grouping and column-filter control state into a query string.

//! Builds the query-string payload describing the current filter/grouping
//! state of the delta view.
//!
//! The output is wire-compatible with the existing endpoint: keys and values
//! are joined verbatim, with no percent-escaping. Column names containing
//! reserved URL characters would corrupt the string; the console only uses
//! bare identifiers, so this keeps the historical format rather than
//! changing what the server receives.

use dom_query::{Document, Matcher, Selection};

use crate::error::Result;
use crate::matchers;
use crate::selection::{is_checked, option_value, resolve_container};

/// Selectors of the three well-known filter controls.
#[derive(Debug, Clone)]
pub struct RenderControls {
    /// The group-by dropdown.
    pub group_by: String,
    /// The summary filter checkbox.
    pub summary: String,
    /// The errors-only filter checkbox.
    pub errors: String,
}

impl Default for RenderControls {
    fn default() -> Self {
        Self {
            group_by: "#groupBy".to_string(),
            summary: "#summaryFilter".to_string(),
            errors: "#errorsFilter".to_string(),
        }
    }
}

/// Assembles the render parameters for a refresh request.
///
/// When `group_by` is not supplied it is read from the group-by control.
/// The `summary` and `errors` booleans always come from their checkboxes;
/// both controls must exist. Every column in `columns` other than the
/// group-by column contributes `<column>=<checked>` when an element with
/// that id exists, and is skipped silently otherwise.
pub fn build_render_params<S: AsRef<str>>(
    doc: &Document,
    group_by: Option<&str>,
    columns: &[S],
    controls: &RenderControls,
) -> Result<String> {
    const OP: &str = "RenderParams";

    let group_by = match group_by {
        Some(v) => v.to_string(),
        None => {
            let control = resolve_container(doc, &controls.group_by, OP)?;
            control_value(&control)
        }
    };

    let summary = resolve_container(doc, &controls.summary, OP)?;
    let errors = resolve_container(doc, &controls.errors, OP)?;

    let mut p = format!("groupBy={}", group_by);
    p.push_str(&format!("&summary={}", is_checked(&summary)));
    p.push_str(&format!("&errors={}", is_checked(&errors)));

    for column in columns {
        let column = column.as_ref();
        if column == group_by {
            continue;
        }
        // Columns without a matching control are skipped, like the original
        // null check on getElementById.
        let Ok(matcher) = Matcher::new(&format!("#{}", column)) else {
            continue;
        };
        if let Some(el) = doc.select_matcher(&matcher).iter().next() {
            p.push_str(&format!("&{}={}", column, is_checked(&el)));
        }
    }

    Ok(p)
}

/// A control's current value: for a dropdown the selected (or first) option,
/// otherwise its `value` attribute.
fn control_value(control: &Selection<'_>) -> String {
    let options: Vec<Selection<'_>> = control.select_matcher(&matchers::OPTION).iter().collect();
    if !options.is_empty() {
        let selected = options.iter().find(|o| o.attr("selected").is_some());
        return option_value(selected.unwrap_or(&options[0]));
    }
    control
        .attr("value")
        .map(|v| v.to_string())
        .unwrap_or_default()
}
