// Key-value pairs display component
//
// Shows structured attributes to the user. A pair's value is either a plain
// string or a mixed stream of text blocks and tool/object representations,
// so the LLM can interleave prose with structured detail.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use toolview_core::{ComponentDefinition, Result};

/// Tool name for the key-value pairs display
pub const KEY_VALUE_TOOL: &str = "ui.displayKeyValuePairs";

/// One item in a mixed content stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentItem {
    /// A block of plain text
    Text(String),
    /// A representation of a tool call or structured object
    Tool {
        tool: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<Value>,
    },
}

/// A pair's value: simple string or mixed content stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PairValue {
    Text(String),
    Stream(Vec<ContentItem>),
}

/// One key-value pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub key: String,
    pub value: PairValue,
}

/// Call parameters for `ui.displayKeyValuePairs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyValueParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub pairs: Vec<KeyValuePair>,
}

/// View data for the key-value pairs display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyValueView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub items: Vec<KeyValuePair>,
}

/// Build the `ui.displayKeyValuePairs` definition
pub fn key_value_pairs_display() -> Result<ComponentDefinition> {
    ComponentDefinition::builder(KEY_VALUE_TOOL)
        .description(
            "Displays a list of key-value pairs. Useful for showing structured data, \
             attributes, or properties.",
        )
        .input_schema(json!({
            "type": "object",
            "properties": {
                "title": {
                    "type": "string",
                    "description": "An optional title for the key-value pair display."
                },
                "pairs": {
                    "type": "array",
                    "description": "An array of key-value pairs to display.",
                    "items": {
                        "type": "object",
                        "properties": {
                            "key": { "type": "string", "description": "The key for the data point." },
                            "value": {
                                "description": "The value: a simple string or a stream of mixed text and tool/object representations.",
                                "oneOf": [
                                    { "type": "string" },
                                    {
                                        "type": "array",
                                        "items": {
                                            "oneOf": [
                                                { "type": "string" },
                                                {
                                                    "type": "object",
                                                    "properties": {
                                                        "tool": { "type": "string" },
                                                        "details": { "type": "object" }
                                                    },
                                                    "required": ["tool"]
                                                }
                                            ]
                                        }
                                    }
                                ]
                            }
                        },
                        "required": ["key", "value"]
                    }
                }
            },
            "required": ["pairs"],
            "additionalProperties": false
        }))
        // Display-only: the server just echoes the params back
        .execute(|params| async move { Ok(params) })
        .transform(|raw| {
            let params: KeyValueParams = serde_json::from_value(raw)?;
            Ok(serde_json::to_value(KeyValueView {
                title: params.title,
                items: params.pairs,
            })?)
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_simple_values() {
        let definition = key_value_pairs_display().unwrap();

        let view = (definition.transform)(json!({
            "title": "Server",
            "pairs": [{"key": "host", "value": "example.com"}]
        }))
        .unwrap();

        assert_eq!(view["title"], "Server");
        assert_eq!(view["items"][0]["key"], "host");
        assert_eq!(view["items"][0]["value"], "example.com");
    }

    #[test]
    fn test_transform_mixed_content_stream() {
        let definition = key_value_pairs_display().unwrap();

        let view = (definition.transform)(json!({
            "pairs": [{
                "key": "trace",
                "value": [
                    "called ",
                    {"tool": "todo.list", "details": {"filter": "all"}},
                    " and rendered the result"
                ]
            }]
        }))
        .unwrap();

        let stream = view["items"][0]["value"].as_array().unwrap();
        assert_eq!(stream.len(), 3);
        assert_eq!(stream[1]["tool"], "todo.list");
    }

    #[test]
    fn test_pair_value_untagged_round_trip() {
        let text: PairValue = serde_json::from_value(json!("plain")).unwrap();
        assert_eq!(text, PairValue::Text("plain".to_string()));

        let stream: PairValue =
            serde_json::from_value(json!([{"tool": "t"}, "x"])).unwrap();
        assert_eq!(
            stream,
            PairValue::Stream(vec![
                ContentItem::Tool {
                    tool: "t".to_string(),
                    details: None
                },
                ContentItem::Text("x".to_string()),
            ])
        );
    }
}
