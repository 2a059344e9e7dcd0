use regex::Regex;

use crate::error::ParseError;
use crate::parser::ASK_USER_MARKER;
use crate::response::Outcome;

/// Detects the built-in `user::askuser` invocation and extracts the
/// question to put to the human.
///
/// The marker alone commits the classification: once present, a missing
/// `<parameters>` block or `<question>` span is a hard failure with its own
/// reprompt, never a fallthrough.
pub struct AskUserClassifier {
    parameters: Regex,
    question: Regex,
}

impl AskUserClassifier {
    pub fn new() -> Self {
        Self {
            parameters: Regex::new(r"(?s)<parameters>(.*?)</parameters>").expect("valid regex"),
            question: Regex::new(r"(?s)<question>(.*?)</question>").expect("valid regex"),
        }
    }

    pub fn classify(&self, text: &str) -> Result<Option<Outcome>, ParseError> {
        if !text.contains(ASK_USER_MARKER) {
            return Ok(None);
        }

        let caps = self
            .parameters
            .captures(text)
            .ok_or(ParseError::MalformedAskUser)?;
        let params = caps[1].trim();

        let question = self
            .question
            .captures(params)
            .ok_or(ParseError::MissingAskUserQuestion)?;

        Ok(Some(Outcome::AskUser {
            question: question[1].to_string(),
        }))
    }
}

impl Default for AskUserClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_marker_falls_through() {
        let classifier = AskUserClassifier::new();
        assert_eq!(classifier.classify("<answer>hi</answer>"), Ok(None));
    }

    #[test]
    fn extracts_question() {
        let classifier = AskUserClassifier::new();
        let text = "<tool_name>user::askuser</tool_name>\
                    <parameters><question>What city?</question></parameters>";
        assert_eq!(
            classifier.classify(text),
            Ok(Some(Outcome::AskUser {
                question: "What city?".to_string()
            }))
        );
    }

    #[test]
    fn missing_question_is_hard_error() {
        let classifier = AskUserClassifier::new();
        let text = "<tool_name>user::askuser</tool_name>\
                    <parameters><city>NYC</city></parameters>";
        assert_eq!(
            classifier.classify(text),
            Err(ParseError::MissingAskUserQuestion)
        );
    }

    #[test]
    fn missing_parameters_block_is_hard_error() {
        let classifier = AskUserClassifier::new();
        let text = "<tool_name>user::askuser</tool_name>";
        assert_eq!(classifier.classify(text), Err(ParseError::MalformedAskUser));
    }
}
