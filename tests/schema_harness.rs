//! Keeps the advertised tool input schemas honest: the documented example
//! arguments must validate, and missing required fields must not.

use serde_json::Value;

use mcp_transcript_server::handlers;
use mcp_transcript_server::schema::{validate_json, validate_value};

fn input_schema(tool_name: &str) -> Value {
    let catalogue = handlers::tool_catalogue();
    catalogue
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"].as_str() == Some(tool_name))
        .unwrap_or_else(|| panic!("tool {tool_name} not advertised"))["inputSchema"]
        .clone()
}

#[test]
fn json_schema_harness_validates_instance() {
    let schema = r#"{
      "$schema": "https://json-schema.org/draft/2020-12/schema",
      "type": "object",
      "required": ["error"],
      "additionalProperties": false,
      "properties": {
        "error": {
          "type": "object",
          "required": ["code", "message"],
          "additionalProperties": false,
          "properties": {
            "code": { "type": "string" },
            "message": { "type": "string", "minLength": 1 }
          }
        }
      }
    }"#;

    let instance = r#"{
      "error": {
        "code": "access_denied",
        "message": "You don't have access to Client Z"
      }
    }"#;

    validate_json(schema, instance).expect("schema validation failed");
}

#[test]
fn search_schema_accepts_documented_arguments() {
    let schema = input_schema("searchTranscripts");

    let full = serde_json::json!({
        "query": "forecasting",
        "clientFilter": "Client X",
        "dateFrom": "2024-10-01",
        "dateTo": "2024-10-31"
    });
    validate_value(&schema, &full).unwrap();

    let minimal = serde_json::json!({ "query": "" });
    validate_value(&schema, &minimal).unwrap();

    let missing_query = serde_json::json!({ "clientFilter": "Client X" });
    assert!(validate_value(&schema, &missing_query).is_err());
}

#[test]
fn details_schema_requires_transcript_id() {
    let schema = input_schema("getTranscriptDetails");

    validate_value(&schema, &serde_json::json!({ "transcriptId": "transcript-001" })).unwrap();
    assert!(validate_value(&schema, &serde_json::json!({})).is_err());
}

#[test]
fn list_schema_has_no_required_fields_and_documents_the_default() {
    let schema = input_schema("listRecentCalls");

    validate_value(&schema, &serde_json::json!({})).unwrap();
    validate_value(&schema, &serde_json::json!({ "limit": 5 })).unwrap();

    assert_eq!(schema["properties"]["limit"]["default"].as_i64().unwrap(), 10);
}
