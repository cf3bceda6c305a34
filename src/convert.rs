//! json conversion
//!
//! format translation collaborators for the json workbench: yaml via
//! serde_yaml, xml via a small element writer (map keys become
//! elements, array items repeat the element, scalars become text
//! nodes, everything wrapped in a `root` element). no schema
//! awareness.

use crate::error::{Error, Result};
use serde_json::Value;

/// render a json value as yaml text
pub fn json_to_yaml(value: &Value) -> Result<String> {
    serde_yaml::to_string(value).map_err(|err| Error::Parse(err.to_string()))
}

/// render a json value as xml text
pub fn json_to_xml(value: &Value) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
    write_element(&mut out, "root", value, 0);
    out
}

fn write_element(out: &mut String, name: &str, value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(map) if !map.is_empty() => {
            out.push_str(&format!("{indent}<{name}>\n"));
            for (key, child) in map {
                write_element(out, key, child, depth + 1);
            }
            out.push_str(&format!("{indent}</{name}>\n"));
        }
        Value::Array(items) => {
            for item in items {
                write_element(out, name, item, depth);
            }
        }
        Value::Null | Value::Object(_) => {
            out.push_str(&format!("{indent}<{name}/>\n"));
        }
        Value::String(text) => {
            out.push_str(&format!("{indent}<{name}>{}</{name}>\n", escape_xml(text)));
        }
        other => {
            out.push_str(&format!("{indent}<{name}>{other}</{name}>\n"));
        }
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
