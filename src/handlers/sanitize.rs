use once_cell::sync::Lazy;
use regex::Regex;

// Non-greedy so text between two script blocks survives; `s` lets a block span lines.
static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script[^>]*>.*?</script\s*>").expect("script block pattern is valid")
});

/// Removes `<script>...</script>` blocks and trims the result.
///
/// Only complete script blocks are removed. Other markup, inline event
/// handlers and an unterminated `<script>` pass through unchanged, so the
/// output is not safe to render as HTML.
pub fn strip_script_tags(message: &str) -> String {
    SCRIPT_BLOCK.replace_all(message, "").trim().to_string()
}
