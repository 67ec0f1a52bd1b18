//! Free-text sanitization
//!
//! Strips markup and script-injection fragments from user input before it is
//! validated or echoed back. This is pattern removal, not an HTML parser.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
static SCRIPT_SCHEME_REGEX: OnceLock<Regex> = OnceLock::new();
static EVENT_HANDLER_REGEX: OnceLock<Regex> = OnceLock::new();

fn tag_regex() -> &'static Regex {
    TAG_REGEX.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex pattern"))
}

fn script_scheme_regex() -> &'static Regex {
    SCRIPT_SCHEME_REGEX
        .get_or_init(|| Regex::new(r"(?i-u)javascript:").expect("Invalid script scheme regex pattern"))
}

fn event_handler_regex() -> &'static Regex {
    EVENT_HANDLER_REGEX.get_or_init(|| {
        Regex::new(r"(?i-u)on[0-9a-z_]+=").expect("Invalid event handler regex pattern")
    })
}

/// Removal passes before the sanitizer gives up on reaching a fixed point
pub const MAX_STRIP_PASSES: usize = 8;

/// Characters every forbidden pattern needs; dropped from text that is still
/// changing after [`MAX_STRIP_PASSES`]
const MARKUP_CHARS: &[char] = &['<', '>', ':', '='];

/// Sanitize an optional piece of text.
///
/// Removes `<...>` tags, `javascript:` and `on<word>=` (both ASCII
/// case-insensitive), then trims. Removal is repeated until nothing changes,
/// so fragments left on either side of a removed match cannot join into a new
/// forbidden pattern. Text that is still changing after [`MAX_STRIP_PASSES`]
/// loses every `<`, `>`, `:` and `=` instead, which keeps the cost linear in
/// the input length.
pub fn sanitize(input: Option<&str>) -> String {
    let Some(input) = input else {
        return String::new();
    };

    let mut current = input.to_string();
    for _ in 0..MAX_STRIP_PASSES {
        let next = strip_once(&current);
        if next == current {
            return current.trim().to_string();
        }
        current = next;
    }

    if strip_once(&current) != current {
        tracing::debug!(len = current.len(), "Sanitizer pass limit reached, dropping markup characters");
        current.retain(|c| !MARKUP_CHARS.contains(&c));
    }

    current.trim().to_string()
}

/// Sanitize a raw JSON value; anything but a string becomes empty.
pub fn sanitize_value(value: Option<&Value>) -> String {
    sanitize(value.and_then(Value::as_str))
}

/// Check whether text still carries any pattern the sanitizer removes
pub fn contains_markup(text: &str) -> bool {
    tag_regex().is_match(text)
        || script_scheme_regex().is_match(text)
        || event_handler_regex().is_match(text)
}

fn strip_once(input: &str) -> String {
    let without_tags = tag_regex().replace_all(input, "");
    let without_scheme = script_scheme_regex().replace_all(&without_tags, "").into_owned();
    event_handler_regex()
        .replace_all(&without_scheme, "")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_and_non_string_input() {
        assert_eq!(sanitize(None), "");
        assert_eq!(sanitize_value(None), "");
        assert_eq!(sanitize_value(Some(&Value::Null)), "");
        assert_eq!(sanitize_value(Some(&json!(4))), "");
        assert_eq!(sanitize_value(Some(&json!(["a"]))), "");
        assert_eq!(sanitize_value(Some(&json!(" Ana "))), "Ana");
    }

    #[test]
    fn test_strips_tags() {
        assert_eq!(sanitize(Some("<b>Hello</b> <i>world</i>")), "Hello world");
        assert_eq!(sanitize(Some("<script>alert(1)</script>")), "alert(1)");
        assert_eq!(sanitize(Some("a < b")), "a < b");
    }

    #[test]
    fn test_strips_script_scheme_case_insensitive() {
        assert_eq!(sanitize(Some("JavaScript:alert(1)")), "alert(1)");
        assert_eq!(sanitize(Some("go javascript:now")), "go now");
    }

    #[test]
    fn test_strips_event_handlers() {
        assert_eq!(sanitize(Some("x onclick=steal()")), "x steal()");
        assert_eq!(sanitize(Some("ONERROR=boom")), "boom");
        assert_eq!(sanitize(Some("on=")), "on=");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(sanitize(Some("  \t Ana Smith \n")), "Ana Smith");
    }

    #[test]
    fn test_nested_tag_markup() {
        let output = sanitize(Some("<<script>script>alert(1)<</script>/script>"));
        assert!(!contains_markup(&output), "left markup in {:?}", output);
    }

    #[test]
    fn test_spliced_patterns_are_removed() {
        assert_eq!(sanitize(Some("javajavascript:script:void")), "void");
        assert_eq!(sanitize(Some("oonx=nclick=run")), "run");
        assert_eq!(sanitize(Some("javaonload=script:x")), "x");
    }

    #[test]
    fn test_case_folding_is_ascii_only() {
        let input = "on\u{212A}ey=1 java\u{17F}cript:x";
        assert_eq!(sanitize(Some(input)), input);
        assert!(!contains_markup(input));
        assert_eq!(sanitize(Some("OnKey=1 JAVASCRIPT:x")), "1 x");
    }

    #[test]
    fn test_deeply_spliced_input_drops_markup_characters() {
        let depth = 32_000;
        let input = format!("Hi {}{} there", "java".repeat(depth), "script:".repeat(depth));

        let output = sanitize(Some(&input));

        assert!(!contains_markup(&output));
        assert!(!output.contains(':'));
        assert!(output.starts_with("Hi java"));
        assert!(output.ends_with("script there"));
        assert_eq!(sanitize(Some(&output)), output);
    }

    #[test]
    fn test_shallow_splices_keep_other_punctuation() {
        let output = sanitize(Some("Table at 19:00 javajavascript:script:please"));
        assert_eq!(output, "Table at 19:00 please");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "plain text",
            "  <p>Table for two</p>  ",
            "javajavascript:script:void",
            "<img src=x onerror=alert(1)>",
            "Fish & chips, 7pm",
        ];

        for input in inputs {
            let once = sanitize(Some(input));
            assert_eq!(sanitize(Some(&once)), once);
        }
    }

    #[test]
    fn test_output_never_contains_markup() {
        let inputs = [
            "<a href='javascript:x'>hi</a>",
            "<<b>>",
            "onmouseover=onmouseover==",
            "JAVASCRIPT:JAVASCRIPT::",
            "<div onclick=x>JaVaScRiPt:</div>",
            "o<b>nclick=",
        ];

        for input in inputs {
            let output = sanitize(Some(input));
            assert!(!contains_markup(&output), "{:?} -> {:?}", input, output);
        }
    }
}
