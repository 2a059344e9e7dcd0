use thiserror::Error;

/// Hard parse failures raised by the classifiers.
///
/// Each variant's display string is the exact reprompt message to feed back
/// to the model as corrective guidance on the next turn. The strings are
/// load-bearing: upstream orchestrators forward them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(
        "Missing the parameter 'question' for user::askuser function call. Please try again with the correct argument added."
    )]
    MissingAskUserQuestion,

    #[error(
        "The function call format is incorrect. The format for function calls to the askuser function must be: <invoke> <tool_name>user::askuser</tool_name><parameters><question>$QUESTION</question></parameters></invoke>."
    )]
    MalformedAskUser,

    #[error(
        "The function call format is incorrect. The format for function calls must be: <invoke> <tool_name>$TOOL_NAME</tool_name> <parameters> <$PARAMETER_NAME>$PARAMETER_VALUE</$PARAMETER_NAME>...</parameters></invoke>."
    )]
    MalformedFunctionCall,

    #[error("Could not parse generated response")]
    UnparseableGeneratedResponse,

    #[error(
        "Missing the parameter 'searchQuery' for knowledge base search. Please try again with the correct argument added."
    )]
    MissingSearchQuery,

    #[error("Failed to parse the LLM output")]
    Unrecognized,
}

impl ParseError {
    /// The corrective instruction for the model's next turn.
    pub fn reprompt(&self) -> String {
        self.to_string()
    }
}
