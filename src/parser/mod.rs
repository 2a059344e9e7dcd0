pub mod answer;
pub mod ask_user;
pub mod function_call;
pub mod rationale;
pub mod sanitize;

pub use answer::AnswerClassifier;
pub use ask_user::AskUserClassifier;
pub use function_call::FunctionCallClassifier;
pub use rationale::RationaleExtractor;
pub use sanitize::sanitize;

use crate::error::ParseError;
use crate::response::{Outcome, ParsedResponse};

/// Marks the final answer span in a completion.
pub const ANSWER_TAG: &str = "<answer>";

/// Marks a function or tool invocation in a completion.
pub const FUNCTION_CALL_TAG: &str = "<fnCall>";

/// Resources named with this prefix are knowledge bases, not action groups.
pub const KNOWLEDGE_BASE_PREFIX: &str = "x_amz_knowledgebase_";

/// The built-in tool name for putting a question back to the human.
pub const ASK_USER_MARKER: &str = "<tool_name>user::askuser</tool_name>";

/// One classification stage in the dispatch pipeline.
///
/// `Ok(None)` means the stage does not apply and the dispatcher moves on.
/// `Ok(Some)` and `Err` are both terminal: a stage whose marker is present
/// but whose structure is malformed must error, never fall through.
pub trait Classifier: Send + Sync {
    fn name(&self) -> &'static str;
    fn classify(&self, text: &str) -> Result<Option<Outcome>, ParseError>;
}

impl Classifier for AnswerClassifier {
    fn name(&self) -> &'static str {
        "answer"
    }

    fn classify(&self, text: &str) -> Result<Option<Outcome>, ParseError> {
        AnswerClassifier::classify(self, text)
    }
}

impl Classifier for AskUserClassifier {
    fn name(&self) -> &'static str {
        "ask_user"
    }

    fn classify(&self, text: &str) -> Result<Option<Outcome>, ParseError> {
        AskUserClassifier::classify(self, text)
    }
}

impl Classifier for FunctionCallClassifier {
    fn name(&self) -> &'static str {
        "function_call"
    }

    fn classify(&self, text: &str) -> Result<Option<Outcome>, ParseError> {
        FunctionCallClassifier::classify(self, text)
    }
}

/// Classifies raw orchestration completions into structured outcomes.
///
/// All patterns are compiled once at construction; `parse` takes `&self`
/// and allocates fresh output, so one parser can be shared freely across
/// threads.
pub struct ResponseParser {
    rationale: RationaleExtractor,
    // Priority order is load-bearing: answer, then ask-user, then function
    // call. A tool call whose payload contains an <answer> substring relies
    // on the tag-recency rule plus this ordering to land correctly.
    stages: Vec<Box<dyn Classifier>>,
}

impl ResponseParser {
    pub fn new() -> Self {
        Self {
            rationale: RationaleExtractor::new(),
            stages: vec![
                Box::new(AnswerClassifier::new()),
                Box::new(AskUserClassifier::new()),
                Box::new(FunctionCallClassifier::new()),
            ],
        }
    }

    /// Parses one raw model completion. Never fails from the caller's point
    /// of view: malformed input becomes `Outcome::ParseFailure` carrying
    /// the reprompt message for the model's next turn.
    pub fn parse(&self, raw: &str) -> ParsedResponse {
        let text = sanitize(raw);
        tracing::debug!(len = text.len(), "sanitized model output");

        let rationale = self.rationale.extract(&text);

        for stage in &self.stages {
            match stage.classify(&text) {
                Ok(Some(outcome)) => {
                    tracing::debug!(stage = stage.name(), "classified");
                    return ParsedResponse { rationale, outcome };
                }
                Ok(None) => {}
                Err(err) => {
                    let reprompt = err.reprompt();
                    tracing::warn!(stage = stage.name(), %reprompt, "reprompting model");
                    return ParsedResponse {
                        rationale,
                        outcome: Outcome::ParseFailure { reprompt },
                    };
                }
            }
        }

        let reprompt = ParseError::Unrecognized.reprompt();
        tracing::warn!(%reprompt, "no classifier matched");
        ParsedResponse {
            rationale,
            outcome: Outcome::ParseFailure { reprompt },
        }
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}
