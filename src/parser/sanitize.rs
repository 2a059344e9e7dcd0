use std::sync::LazyLock;

use regex::Regex;

static ESCAPED_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\\n)+").expect("valid regex"));

/// Collapses each run of literal `\n` escape sequences into a single real
/// newline. Upstream transports sometimes double-escape newlines; the tag
/// patterns downstream assume real line breaks.
///
/// Pure and idempotent: text without literal escapes passes through
/// unchanged.
pub fn sanitize(raw: &str) -> String {
    ESCAPED_NEWLINES.replace_all(raw, "\n").into_owned()
}
