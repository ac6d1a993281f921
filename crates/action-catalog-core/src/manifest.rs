//! Tolerant action manifest parser.
//!
//! Any input yields a [`ManifestRecord`]. Unreadable documents keep the
//! [`UNDEFINED`] defaults and are reported as a warning only.

use serde_yaml_ng::Value;
use tracing::{info, warn};

use crate::model::{ActionStep, ManifestRecord, Steps, UNDEFINED};
use crate::sanitize::sanitize;

/// Parse the raw text of an `action.yml` into a normalized record.
///
/// `file_path` and `repo` are only used for diagnostics.
pub fn parse_manifest(file_path: &str, repo: Option<&str>, raw: &str) -> ManifestRecord {
    match serde_yaml_ng::from_str::<Value>(raw) {
        Ok(doc) => record_from_document(&doc),
        Err(err) => {
            warn!(
                file = %file_path,
                repo = repo.unwrap_or("unknown"),
                error = %err,
                "Error parsing action file [{}] in repo [{}]",
                file_path,
                repo.unwrap_or("unknown"),
            );
            info!("The parsing error is informational, searching for actions has continued");
            ManifestRecord::default()
        }
    }
}

fn record_from_document(doc: &Value) -> ManifestRecord {
    let runs = doc.get("runs");
    ManifestRecord {
        name: text_field(doc.get("name")),
        author: text_field(doc.get("author")),
        description: text_field(doc.get("description")),
        using: text_field(runs.and_then(|r| r.get("using"))),
        steps: runs
            .and_then(|r| r.get("steps"))
            .map(extract_steps)
            .unwrap_or_default(),
    }
}

/// Sanitized text of a scalar, or [`UNDEFINED`] for anything falsy,
/// non-scalar, or left empty by sanitizing.
fn text_field(value: Option<&Value>) -> String {
    value
        .and_then(scalar_text)
        .map(|text| sanitize(&text))
        .filter(|clean| !clean.is_empty())
        .unwrap_or_else(|| UNDEFINED.to_string())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Bool(true) => Some("true".to_string()),
        Value::Number(n) => match n.as_f64() {
            Some(f) if f == 0.0 || f.is_nan() => None,
            _ => Some(n.to_string()),
        },
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        _ => None,
    }
}

fn extract_steps(steps: &Value) -> Steps {
    let mut out = Steps::default();
    let Some(items) = steps.as_sequence() else {
        return out;
    };

    for item in items {
        match item.get("uses").and_then(Value::as_str) {
            Some(reference) => out.actions.push(split_reference(reference)),
            None => out
                .shell
                .push(serde_json::to_value(item).unwrap_or(serde_json::Value::Null)),
        }
    }
    out
}

/// `owner/repo@ref` -> (`owner/repo`, `ref`). The last `@` separates the ref.
fn split_reference(reference: &str) -> ActionStep {
    match reference.rsplit_once('@') {
        Some((action, git_ref)) => ActionStep {
            action: action.to_string(),
            git_ref: git_ref.to_string(),
        },
        None => ActionStep {
            action: reference.to_string(),
            git_ref: String::new(),
        },
    }
}
