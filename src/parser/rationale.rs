use regex::Regex;

/// Pulls the model's free-text rationale out of a sanitized completion.
///
/// The rationale is whatever precedes the first `<fnCall>` (or, failing
/// that, the first `<answer>`) tag, with any `<thinking>` framing stripped.
/// A completion with neither tag has no rationale; that is not an error.
pub struct RationaleExtractor {
    prefix_patterns: [Regex; 2],
    value_patterns: [Regex; 3],
}

impl RationaleExtractor {
    pub fn new() -> Self {
        Self {
            prefix_patterns: [
                Regex::new(r"(?s)(.*?)<fnCall>").expect("valid regex"),
                Regex::new(r"(?s)(.*?)<answer>").expect("valid regex"),
            ],
            // Tried in order: a closed thinking block, text before a lone
            // closing tag, text after a lone opening tag.
            value_patterns: [
                Regex::new(r"(?s)<thinking>(.*?)</thinking>").expect("valid regex"),
                Regex::new(r"(?s)(.*?)</thinking>").expect("valid regex"),
                Regex::new(r"(?s)<thinking>(.*)").expect("valid regex"),
            ],
        }
    }

    pub fn extract(&self, text: &str) -> Option<String> {
        let caps = self
            .prefix_patterns
            .iter()
            .find_map(|pattern| pattern.captures(text))?;
        let candidate = caps[1].trim();

        let rationale = self
            .value_patterns
            .iter()
            .find_map(|pattern| pattern.captures(candidate))
            .map(|caps| caps[1].trim().to_string())
            .unwrap_or_else(|| candidate.to_string());

        Some(rationale).filter(|r| !r.is_empty())
    }
}

impl Default for RationaleExtractor {
    fn default() -> Self {
        Self::new()
    }
}
