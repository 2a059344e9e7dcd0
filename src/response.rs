use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Verb reported for every action group invocation. The orchestration
/// format carries no verb of its own, so this is a fixed constant rather
/// than something derived from the model output.
pub const ACTION_GROUP_VERB: &str = "GET";

/// The structured result of parsing one raw model completion.
///
/// `rationale` is orthogonal to the outcome: it may accompany any of the
/// five kinds, including a parse failure. Serializes flat, e.g.
/// `{"rationale": "...", "invocationType": "FINISH", "text": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ParsedResponse {
    /// True when the model must be re-queried with the reprompt message.
    pub fn needs_reprompt(&self) -> bool {
        matches!(self.outcome, Outcome::ParseFailure { .. })
    }
}

/// Exactly one outcome is produced per parse call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "invocationType")]
pub enum Outcome {
    /// The model produced its final response for the user.
    #[serde(rename = "FINISH")]
    FinalAnswer {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        citations: Option<Vec<ResponsePart>>,
    },

    /// The model wants to put a question to the human before proceeding.
    #[serde(rename = "ASK_USER")]
    AskUser { question: String },

    /// The model wants a retrieval query run against a knowledge base.
    #[serde(rename = "KNOWLEDGE_BASE")]
    KnowledgeBase(KnowledgeBaseInvocation),

    /// The model wants an action group function invoked.
    #[serde(rename = "ACTION_GROUP")]
    ActionGroup(ActionGroupInvocation),

    /// The output was malformed; `reprompt` is the corrective instruction
    /// to send back to the model. Terminal from the caller's point of view,
    /// not an error.
    #[serde(rename = "REPROMPT")]
    ParseFailure { reprompt: String },
}

/// One segment of a cited answer with the sources backing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePart {
    pub text: String,
    pub references: Vec<Reference>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "sourceId")]
    pub source_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeBaseInvocation {
    pub knowledge_base_id: String,
    pub search_query: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionGroupInvocation {
    pub verb: String,
    pub action_group_name: String,
    pub function_name: String,
    /// Parameter name to value. BTreeMap keeps serialized output stable.
    pub parameters: BTreeMap<String, ParameterValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterValue {
    pub value: String,
}
