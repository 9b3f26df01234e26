// ABOUTME: HTML text-content escaping helper.
// ABOUTME: Escapes the minimum entity set; re-encoding already-escaped text double-escapes.

/// Escapes text for safe insertion as HTML text content.
///
/// Escapes `& < > "` in that order (ampersand first). Feeding already
/// escaped text through again double-escapes it; the output is always the
/// literal rendition of the input.
pub fn encode_as_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_basic() {
        assert_eq!(
            encode_as_html(r#"<a>&"b"</a>"#),
            "&lt;a&gt;&amp;&quot;b&quot;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_encode_plain_text_unchanged() {
        assert_eq!(encode_as_html("plain text"), "plain text");
        assert_eq!(encode_as_html(""), "");
    }

    #[test]
    fn test_encode_double_escapes() {
        // Re-encoding is not collapsed
        assert_eq!(encode_as_html("&amp;"), "&amp;amp;");
        assert_eq!(encode_as_html(&encode_as_html("<")), "&amp;lt;");
    }
}
