use regex::Regex;

use crate::error::ParseError;
use crate::parser::{ANSWER_TAG, FUNCTION_CALL_TAG};
use crate::response::{Outcome, Reference, ResponsePart};

/// Classifies a completion as a final answer, cited or plain.
///
/// The cited shape (`<answer_part>` blocks) is checked first and wins
/// outright. The plain shape additionally requires the tag-recency rule:
/// the last `<answer>` must come after the last `<fnCall>`, so a trailing
/// function call disqualifies an earlier answer tag.
pub struct AnswerClassifier {
    answer_body: Regex,
    part: Regex,
    part_text: Regex,
    part_source: Regex,
}

impl AnswerClassifier {
    pub fn new() -> Self {
        // The part tags tolerate a single trailing space, e.g. `<answer_part >`.
        Self {
            answer_body: Regex::new(r"(?s)<answer>(.*)").expect("valid regex"),
            part: Regex::new(r"(?s)<answer_part\s?>(.+?)</answer_part\s?>").expect("valid regex"),
            part_text: Regex::new(r"(?s)<text\s?>(.+?)</text\s?>").expect("valid regex"),
            part_source: Regex::new(r"(?s)<source\s?>(.+?)</source\s?>").expect("valid regex"),
        }
    }

    pub fn classify(&self, text: &str) -> Result<Option<Outcome>, ParseError> {
        if self.part.is_match(text) {
            return self.parse_cited(text).map(Some);
        }

        if !is_answer(text) {
            return Ok(None);
        }

        // Everything after the first <answer> tag is the answer text, minus
        // a closing tag if the model emitted one. An empty body is treated
        // as no answer, not as an empty one.
        let Some(caps) = self.answer_body.captures(text) else {
            return Ok(None);
        };
        let answer = caps[1].trim().trim_end_matches("</answer>").trim();
        if answer.is_empty() {
            return Ok(None);
        }

        Ok(Some(Outcome::FinalAnswer {
            text: answer.to_string(),
            citations: None,
        }))
    }

    fn parse_cited(&self, text: &str) -> Result<Outcome, ParseError> {
        let mut parts = Vec::new();

        for caps in self.part.captures_iter(text) {
            let body = caps[1].trim();

            let text_caps = self
                .part_text
                .captures(body)
                .ok_or(ParseError::UnparseableGeneratedResponse)?;

            let references = self
                .part_source
                .captures_iter(body)
                .map(|source| Reference {
                    source_id: source[1].trim().to_string(),
                })
                .collect();

            parts.push(ResponsePart {
                text: text_caps[1].trim().to_string(),
                references,
            });
        }

        let joined = parts
            .iter()
            .map(|part| part.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(Outcome::FinalAnswer {
            text: joined,
            citations: Some(parts),
        })
    }
}

impl Default for AnswerClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Tag-recency rule: the completion is an answer only when its last
/// `<answer>` occurs after its last `<fnCall>`. An answer with no function
/// call at all qualifies; no answer tag never does.
fn is_answer(text: &str) -> bool {
    match (text.rfind(ANSWER_TAG), text.rfind(FUNCTION_CALL_TAG)) {
        (Some(answer), Some(fn_call)) => answer > fn_call,
        (Some(_), None) => true,
        (None, _) => false,
    }
}
