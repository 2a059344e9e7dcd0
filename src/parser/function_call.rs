use std::collections::BTreeMap;

use regex::Regex;

use crate::error::ParseError;
use crate::parser::{FUNCTION_CALL_TAG, KNOWLEDGE_BASE_PREFIX};
use crate::response::{
    ACTION_GROUP_VERB, ActionGroupInvocation, KnowledgeBaseInvocation, Outcome, ParameterValue,
};

/// Extracts a `<fnCall>` invocation and routes it to either a knowledge
/// base query or an action group call.
///
/// Tool names carry a `resource::function` shape. Resources whose lowercase
/// name starts with the knowledge-base prefix are retrieval queries; the id
/// is the resource name with the prefix stripped. Everything else is an
/// action group invocation with the full parameter map.
pub struct FunctionCallClassifier {
    tool_name: Regex,
    parameters: Regex,
    parameter_pair: Regex,
}

impl FunctionCallClassifier {
    pub fn new() -> Self {
        Self {
            tool_name: Regex::new(r"(?s)<tool_name>(.*?)</tool_name>").expect("valid regex"),
            parameters: Regex::new(r"(?s)<parameters>(.*?)</parameters>").expect("valid regex"),
            // Flat leaf pairs only: the value may not contain another tag.
            parameter_pair: Regex::new(r"(?s)<([A-Za-z0-9_.:-]+)\s*>([^<]*)</([A-Za-z0-9_.:-]+)\s*>")
                .expect("valid regex"),
        }
    }

    pub fn classify(&self, text: &str) -> Result<Option<Outcome>, ParseError> {
        // No tag at all is a fallthrough so the dispatcher can report the
        // generic failure; a present-but-empty call is malformed.
        let Some(tag_at) = text.find(FUNCTION_CALL_TAG) else {
            return Ok(None);
        };
        let call_body = &text[tag_at + FUNCTION_CALL_TAG.len()..];
        if call_body.trim().is_empty() {
            return Err(ParseError::MalformedFunctionCall);
        }

        let tool_caps = self
            .tool_name
            .captures(text)
            .ok_or(ParseError::MalformedFunctionCall)?;
        let (resource, function) = tool_caps[1]
            .split_once("::")
            .ok_or(ParseError::MalformedFunctionCall)?;
        let resource = resource.trim();
        let function = function.trim();

        let param_caps = self
            .parameters
            .captures(text)
            .ok_or(ParseError::MalformedFunctionCall)?;
        let parameters = self.parse_parameters(param_caps[1].trim());

        if resource.to_lowercase().starts_with(KNOWLEDGE_BASE_PREFIX) {
            let search_query = parameters
                .get("searchQuery")
                .map(|param| param.value.clone())
                .ok_or(ParseError::MissingSearchQuery)?;

            return Ok(Some(Outcome::KnowledgeBase(KnowledgeBaseInvocation {
                knowledge_base_id: resource[KNOWLEDGE_BASE_PREFIX.len()..].to_string(),
                search_query,
            })));
        }

        Ok(Some(Outcome::ActionGroup(ActionGroupInvocation {
            verb: ACTION_GROUP_VERB.to_string(),
            action_group_name: resource.to_string(),
            function_name: function.to_string(),
            parameters,
        })))
    }

    /// Parses `<name>value</name>` leaf pairs. Values are trimmed of
    /// surrounding whitespace and double quotes. Pairs whose open and close
    /// tags disagree are skipped.
    fn parse_parameters(&self, body: &str) -> BTreeMap<String, ParameterValue> {
        let mut parameters = BTreeMap::new();

        for caps in self.parameter_pair.captures_iter(body) {
            if caps[1] != caps[3] {
                continue;
            }
            let value = caps[2]
                .trim()
                .trim_matches(|c: char| c == '"' || c == ' ')
                .to_string();
            parameters.insert(caps[1].to_string(), ParameterValue { value });
        }

        parameters
    }
}

impl Default for FunctionCallClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(text: &str) -> Result<Option<Outcome>, ParseError> {
        FunctionCallClassifier::new().classify(text)
    }

    #[test]
    fn no_fn_call_tag_falls_through() {
        assert_eq!(classify("nothing here"), Ok(None));
    }

    #[test]
    fn empty_fn_call_is_malformed() {
        assert_eq!(
            classify("<fnCall>   "),
            Err(ParseError::MalformedFunctionCall)
        );
    }

    #[test]
    fn tool_name_without_separator_is_malformed() {
        let text = "<fnCall><tool_name>weather</tool_name>\
                    <parameters></parameters></fnCall>";
        assert_eq!(classify(text), Err(ParseError::MalformedFunctionCall));
    }

    #[test]
    fn action_group_call_extracts_everything() {
        let text = "<fnCall><tool_name>weather::get</tool_name>\
                    <parameters><location>NYC</location></parameters></fnCall>";
        let Ok(Some(Outcome::ActionGroup(call))) = classify(text) else {
            panic!("expected action group");
        };
        assert_eq!(call.verb, "GET");
        assert_eq!(call.action_group_name, "weather");
        assert_eq!(call.function_name, "get");
        assert_eq!(call.parameters["location"].value, "NYC");
    }

    #[test]
    fn values_lose_surrounding_quotes_and_spaces() {
        let text = "<fnCall><tool_name>places::find</tool_name>\
                    <parameters><city> \"New York\" </city></parameters></fnCall>";
        let Ok(Some(Outcome::ActionGroup(call))) = classify(text) else {
            panic!("expected action group");
        };
        assert_eq!(call.parameters["city"].value, "New York");
    }

    #[test]
    fn knowledge_base_prefix_routes_and_strips() {
        let text = "<fnCall><tool_name>x_amz_knowledgebase_kb123::search</tool_name>\
                    <parameters><searchQuery>capitals</searchQuery></parameters></fnCall>";
        let Ok(Some(Outcome::KnowledgeBase(call))) = classify(text) else {
            panic!("expected knowledge base");
        };
        assert_eq!(call.knowledge_base_id, "kb123");
        assert_eq!(call.search_query, "capitals");
    }

    #[test]
    fn knowledge_base_prefix_check_ignores_case() {
        let text = "<fnCall><tool_name>X_AMZ_KNOWLEDGEBASE_kb9::search</tool_name>\
                    <parameters><searchQuery>q</searchQuery></parameters></fnCall>";
        assert!(matches!(
            classify(text),
            Ok(Some(Outcome::KnowledgeBase(_)))
        ));
    }

    #[test]
    fn knowledge_base_without_search_query_is_hard_error() {
        let text = "<fnCall><tool_name>x_amz_knowledgebase_kb123::search</tool_name>\
                    <parameters><q>capitals</q></parameters></fnCall>";
        assert_eq!(classify(text), Err(ParseError::MissingSearchQuery));
    }
}
