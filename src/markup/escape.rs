//! HTML escaping for text and attribute values

use regex::Regex;
use std::sync::OnceLock;

/// Escape markup-significant characters (`& < > " '`)
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// CSS class for a tag span: whitespace runs become hyphens
pub fn tag_class(tag: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));
    format!("tag-{}", re.replace_all(tag, "-"))
}

/// Whether a trusted value would break out of its attribute or inject markup
pub fn is_markup_significant(value: &str) -> bool {
    value.contains(['"', '\'', '<', '>'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_all_special_chars() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_escape_plain_text_unchanged() {
        assert_eq!(escape_html("Kalle Mäkelä"), "Kalle Mäkelä");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_tag_class_hyphenates_whitespace() {
        assert_eq!(tag_class("machine learning"), "tag-machine-learning");
        assert_eq!(tag_class("a \t b"), "tag-a-b");
        assert_eq!(tag_class("rust"), "tag-rust");
    }

    #[test]
    fn test_markup_significant() {
        assert!(is_markup_significant(r#"https://x" onmouseover="alert(1)"#));
        assert!(!is_markup_significant("https://example.com/a?b=c&d=e"));
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn escaped_text_has_no_raw_specials(ref input in ".{0,200}") {
            let out = escape_html(input);
            prop_assert!(!out.contains(['<', '>', '"', '\'']));
            // Every '&' left must start an entity we produced
            for (i, _) in out.match_indices('&') {
                let rest = &out[i..];
                prop_assert!(
                    rest.starts_with("&amp;")
                        || rest.starts_with("&lt;")
                        || rest.starts_with("&gt;")
                        || rest.starts_with("&quot;")
                        || rest.starts_with("&#39;")
                );
            }
        }
    }
}
