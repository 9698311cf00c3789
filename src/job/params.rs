//! `${key}` parameter substitution in parsed job documents
//!
//! Values are substituted into string nodes of the parsed JSON tree, so a
//! value containing quotes or braces can never change the document's
//! structure. Fields holding template or diagram text are left verbatim;
//! their `${...}` markers belong to the template engine.

use log::{debug, warn};
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::core::config::ParameterSource;

/// Substituted when a key resolves nowhere
pub const NOT_FOUND: &str = "not-found";

/// Fields whose text is never substituted
pub const VERBATIM_FIELDS: &[&str] = &["template", "document", "definition", "code"];

static PARAMETER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{\s*([A-Za-z0-9_\-]+(?:\.[A-Za-z0-9_\-]+)*)\s*\}").unwrap());

/// String entries of the job's own `parameters` object
pub fn local_parameters(document: &Value) -> BTreeMap<String, String> {
    document
        .get("parameters")
        .and_then(Value::as_object)
        .map(|map| {
            map.iter()
                .filter_map(|(key, value)| match value {
                    Value::String(s) => Some((key.clone(), s.clone())),
                    Value::Number(n) => Some((key.clone(), n.to_string())),
                    Value::Bool(b) => Some((key.clone(), b.to_string())),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Replace every `${key}` in string values, returning the number of keys
/// that were not found
pub fn substitute<P: ParameterSource + ?Sized>(document: &mut Value, source: &P) -> usize {
    let mut misses = 0;
    substitute_in(document, source, &mut misses);
    misses
}

fn substitute_in<P: ParameterSource + ?Sized>(value: &mut Value, source: &P, misses: &mut usize) {
    match value {
        Value::String(text) => {
            if PARAMETER_PATTERN.is_match(text) {
                *text = substitute_text(text, source, misses);
            }
        }
        Value::Array(items) => {
            for item in items {
                substitute_in(item, source, misses);
            }
        }
        Value::Object(map) => {
            for (key, child) in map.iter_mut() {
                if VERBATIM_FIELDS.contains(&key.as_str()) {
                    continue;
                }
                substitute_in(child, source, misses);
            }
        }
        _ => {}
    }
}

fn substitute_text<P: ParameterSource + ?Sized>(
    text: &str,
    source: &P,
    misses: &mut usize,
) -> String {
    PARAMETER_PATTERN
        .replace_all(text, |caps: &Captures<'_>| {
            let key = &caps[1];
            match source.lookup(key) {
                Some(value) => {
                    debug!(key = key, value = value.as_str(); "Resolved job parameter");
                    value
                }
                None => {
                    warn!(key = key; "Job parameter not found");
                    *misses += 1;
                    NOT_FOUND.to_string()
                }
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Layered;
    use serde_json::json;
    use std::collections::HashMap;

    fn source() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("project.root".to_string(), "diagrams".to_string());
        map.insert("quote".to_string(), "say \"hi\" }".to_string());
        map
    }

    #[test]
    fn test_substitutes_nested_strings() {
        let mut doc = json!({
            "importSteps": [{"source": "${project.root}/bank.gliffy"}],
            "exportSteps": [{"path": "${missing.key}"}]
        });
        let misses = substitute(&mut doc, &source());
        assert_eq!(doc["importSteps"][0]["source"], "diagrams/bank.gliffy");
        assert_eq!(doc["exportSteps"][0]["path"], NOT_FOUND);
        assert_eq!(misses, 1);
    }

    #[test]
    fn test_structural_characters_stay_inside_the_string() {
        let mut doc = json!({"name": "${quote}"});
        substitute(&mut doc, &source());
        assert_eq!(doc["name"], "say \"hi\" }");
    }

    #[test]
    fn test_template_text_is_left_alone() {
        let mut doc = json!({
            "exportSteps": [{
                "template": "class ${definition.name}",
                "definition": {"stereotype": "class", "name": "${definition.name}"}
            }]
        });
        let misses = substitute(&mut doc, &source());
        assert_eq!(misses, 0);
        assert_eq!(doc["exportSteps"][0]["template"], "class ${definition.name}");
    }

    #[test]
    fn test_local_parameters_take_precedence() {
        let mut doc = json!({
            "parameters": {"project.root": "local", "retries": 3},
            "importSteps": [{"source": "${project.root}"}]
        });
        let local = local_parameters(&doc);
        assert_eq!(local.get("retries").map(String::as_str), Some("3"));

        substitute(&mut doc, &Layered(&local, &source()));
        assert_eq!(doc["importSteps"][0]["source"], "local");
    }
}
