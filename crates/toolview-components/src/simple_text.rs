// Simple text display component
//
// The smallest useful component: the LLM calls it to put a piece of plain
// text in front of the user, and the transform reshapes the echoed params
// into the view's field names.

use serde::{Deserialize, Serialize};
use serde_json::json;

use toolview_core::{ComponentDefinition, Result};

/// Tool name for the simple text display
pub const SIMPLE_TEXT_TOOL: &str = "ui.displaySimpleText";

/// Call parameters for `ui.displaySimpleText`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleTextParams {
    /// The text content that needs to be displayed to the user
    pub text_to_display: String,
}

/// View data for the simple text display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleTextView {
    pub display_text: String,
}

/// Build the `ui.displaySimpleText` definition
pub fn simple_text_display() -> Result<ComponentDefinition> {
    ComponentDefinition::builder(SIMPLE_TEXT_TOOL)
        .description(
            "Displays a simple text message to the user. Use this when you need to \
             present a piece of information as plain text.",
        )
        .input_schema(json!({
            "type": "object",
            "properties": {
                "textToDisplay": {
                    "type": "string",
                    "description": "The text content that needs to be displayed to the user."
                }
            },
            "required": ["textToDisplay"],
            "additionalProperties": false
        }))
        // Display-only: the server just echoes the params back
        .execute(|params| async move { Ok(params) })
        .transform(|raw| {
            let params: SimpleTextParams = serde_json::from_value(raw)?;
            Ok(serde_json::to_value(SimpleTextView {
                display_text: params.text_to_display,
            })?)
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_reshapes_params() {
        let definition = simple_text_display().unwrap();

        let view = (definition.transform)(json!({"textToDisplay": "hi"})).unwrap();
        assert_eq!(view, json!({"displayText": "hi"}));
    }

    #[test]
    fn test_transform_rejects_wrong_shape() {
        let definition = simple_text_display().unwrap();
        assert!((definition.transform)(json!({"unexpected": true})).is_err());
    }
}
