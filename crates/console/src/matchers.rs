// ABOUTME: Pre-compiled CSS matchers for the fixed selectors used in hot paths.
// ABOUTME: Compiling once avoids re-parsing the same selector on every call.

use dom_query::Matcher;
use once_cell::sync::Lazy;

use crate::error::ConsoleError;

/// Matches every element (the `getElementsByTagName('*')` equivalent).
pub(crate) static ANY: Lazy<Matcher> =
    Lazy::new(|| Matcher::new("*").expect("universal selector is valid"));

/// Matches form input elements.
pub(crate) static INPUT: Lazy<Matcher> =
    Lazy::new(|| Matcher::new("input").expect("input selector is valid"));

/// Matches dropdown elements.
pub(crate) static SELECT: Lazy<Matcher> =
    Lazy::new(|| Matcher::new("select").expect("select selector is valid"));

/// Matches dropdown options.
pub(crate) static OPTION: Lazy<Matcher> =
    Lazy::new(|| Matcher::new("option").expect("option selector is valid"));

/// Compiles a caller-supplied selector, mapping parse failures to a
/// Selector error carrying the operation name.
pub(crate) fn compile(css: &str, op: &str) -> Result<Matcher, ConsoleError> {
    Matcher::new(css).map_err(|_| ConsoleError::selector(css, op, None))
}
