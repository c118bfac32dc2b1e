//! Tool specifications advertised over `tools/list`.

use serde::Serialize;
use serde_json::{json, Value};

/// A tool the server advertises to MCP clients.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    /// Tool name used in `tools/call`.
    pub name: &'static str,
    /// Human-readable description for the agent.
    pub description: &'static str,
    /// JSON schema of the tool's arguments.
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// All tools this server exposes.
pub fn tool_specs() -> Vec<ToolSpec> {
    vec![
        ToolSpec {
            name: "search_icons",
            description: "Search the icon catalog by keyword. Results are cached and \
                          published to the web picker so a human can choose from them.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "q": {
                        "type": "string",
                        "description": "Search keyword for icons"
                    },
                    "sort_type": {
                        "type": "string",
                        "description": "Sort order: recommend (default) or updated_at",
                        "default": "recommend"
                    },
                    "page": {
                        "type": "integer",
                        "description": "Page number (default: 1)",
                        "default": 1,
                        "minimum": 1
                    },
                    "page_size": {
                        "type": "integer",
                        "description": "Results per page (1-100, default: 100)",
                        "default": 100,
                        "minimum": 1,
                        "maximum": 100
                    }
                },
                "required": ["q"]
            }),
        },
        ToolSpec {
            name: "start_web_server",
            description: "Start the local web picker and begin a fresh selection session. \
                          Returns the picker URL to hand to the human.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "port": {
                        "type": "integer",
                        "description": "Port to bind (default: configured web port)"
                    }
                }
            }),
        },
        ToolSpec {
            name: "stop_web_server",
            description: "Stop the local web picker and discard the selection session.",
            input_schema: json!({ "type": "object", "properties": {} }),
        },
        ToolSpec {
            name: "check_selection_status",
            description: "Non-blocking poll for the human's icon selection. A completed \
                          selection is returned exactly once; call again later while the \
                          state is awaiting_selection.",
            input_schema: json!({ "type": "object", "properties": {} }),
        },
        ToolSpec {
            name: "get_cache_stats",
            description: "Report search-cache statistics (total, active, expired entries).",
            input_schema: json!({ "type": "object", "properties": {} }),
        },
        ToolSpec {
            name: "clear_cache",
            description: "Clear cached search results, either everything or only expired entries.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "expired_only": {
                        "type": "boolean",
                        "description": "Only remove expired entries (default: false)",
                        "default": false
                    }
                }
            }),
        },
        ToolSpec {
            name: "save_icons",
            description: "Save selected icons to the local filesystem as SVG files.",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "icons": {
                        "type": "array",
                        "description": "Icon records to save (as returned by check_selection_status)",
                        "items": { "type": "object" }
                    },
                    "save_path": {
                        "type": "string",
                        "description": "Destination directory (default: ./saved-icons)",
                        "default": "./saved-icons"
                    }
                },
                "required": ["icons"]
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_tools_are_listed() {
        let names: Vec<_> = tool_specs().iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "search_icons",
                "start_web_server",
                "stop_web_server",
                "check_selection_status",
                "get_cache_stats",
                "clear_cache",
                "save_icons",
            ]
        );
    }

    #[test]
    fn test_schemas_are_objects() {
        for spec in tool_specs() {
            assert_eq!(spec.input_schema["type"], "object", "{}", spec.name);
        }
    }
}
