//! Parses raw agent-orchestration model output into structured invocation
//! records.
//!
//! A completion is classified, in priority order, as a final answer
//! (optionally cited), a question back to the user, a knowledge-base query,
//! or an action-group function call. Anything else yields a reprompt
//! message for the model's next turn instead of an error.

pub mod error;
pub mod parser;
pub mod response;

pub use error::ParseError;
pub use parser::{
    ANSWER_TAG, ASK_USER_MARKER, FUNCTION_CALL_TAG, KNOWLEDGE_BASE_PREFIX, ResponseParser,
    sanitize,
};
pub use response::{
    ACTION_GROUP_VERB, ActionGroupInvocation, KnowledgeBaseInvocation, Outcome, ParameterValue,
    ParsedResponse, Reference, ResponsePart,
};
