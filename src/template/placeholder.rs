//! Placeholder resolution for `{{.identifier}}` tokens in template bodies.
//!
//! A token is two opening braces, optional whitespace, a literal dot, an
//! identifier made of ASCII letters, digits or underscore, optional whitespace
//! and two closing braces. Anything else is plain text and passes through
//! untouched.

use std::borrow::Cow;
use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\{\{\s*\.\s*([A-Za-z0-9_]+)\s*\}\}").expect("placeholder pattern is valid");
}

/// Maximum length of a variable key
pub const MAX_KEY_LENGTH: usize = 64;

/// What to do with a token whose key has no value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnMissing {
    /// Replace the token with an empty string
    #[default]
    Empty,
    /// Keep the original token text
    Preserve,
}

impl OnMissing {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnMissing::Empty => "empty",
            OnMissing::Preserve => "preserve",
        }
    }
}

/// Resolve every placeholder token in `template` against `values`.
///
/// Replacement is a single pass: text inserted for one token is never scanned
/// again, so values containing `{{.x}}` come out literally.
pub fn resolve(template: &str, values: &HashMap<String, String>, on_missing: OnMissing) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match values.get(&caps[1]) {
            Some(value) => value.clone(),
            None => match on_missing {
                OnMissing::Empty => String::new(),
                OnMissing::Preserve => caps[0].to_string(),
            },
        })
        .into_owned()
}

/// Convert a JSON object into resolver values.
///
/// Strings are taken as-is, numbers and booleans use their display form,
/// `null` becomes an empty string and arrays/objects their JSON text.
pub fn values_from_json(data: &serde_json::Map<String, serde_json::Value>) -> HashMap<String, String> {
    data.iter()
        .map(|(key, value)| (key.clone(), value_to_string(value)))
        .collect()
}

/// Coerce a single JSON value to its substitution text
pub fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        _ => value.to_string(),
    }
}

/// Distinct placeholder keys in order of first appearance
pub fn extract_placeholders(template: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        let key = &caps[1];
        if !keys.iter().any(|k| k == key) {
            keys.push(key.to_string());
        }
    }
    keys
}

/// Rewrite every token referring to `old_key` as `{{.new_key}}`.
///
/// Whitespace variants of the old token are normalised; tokens for other keys
/// are left exactly as written.
pub fn rename_placeholder<'a>(template: &'a str, old_key: &str, new_key: &str) -> Cow<'a, str> {
    PLACEHOLDER.replace_all(template, |caps: &Captures| {
        if &caps[1] == old_key {
            token_for(new_key)
        } else {
            caps[0].to_string()
        }
    })
}

/// Format a placeholder token for `key`
pub fn token_for(key: &str) -> String {
    format!("{{{{.{}}}}}", key)
}

/// Normalise free text into a variable key.
///
/// Whitespace and non-alphanumeric characters are dropped, a single leading
/// digit is removed and the first character is lowercased.
pub fn format_variable_key(input: &str) -> String {
    let mut key: String = input
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect();

    if key.starts_with(|c: char| c.is_ascii_digit()) {
        key.remove(0);
    }

    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Whether `key` can appear inside a placeholder token
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_KEY_LENGTH
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const ORDER: &str = "Hello {{.firstName}}, order {{.orderNumber}} is {{.status}}.";

    #[test]
    fn test_resolve_missing_as_empty() {
        let vars = values(&[("firstName", "Jane"), ("orderNumber", "42")]);
        assert_eq!(
            resolve(ORDER, &vars, OnMissing::Empty),
            "Hello Jane, order 42 is ."
        );
    }

    #[test]
    fn test_resolve_missing_preserved() {
        let vars = values(&[("firstName", "Jane"), ("orderNumber", "42")]);
        assert_eq!(
            resolve(ORDER, &vars, OnMissing::Preserve),
            "Hello Jane, order 42 is {{.status}}."
        );
    }

    #[test]
    fn test_resolve_without_tokens_is_identity() {
        let text = "<p>No placeholders { here } {{ nor here }}</p>";
        let vars = values(&[("here", "x")]);
        assert_eq!(resolve(text, &vars, OnMissing::Empty), text);
        assert_eq!(resolve(text, &vars, OnMissing::Preserve), text);
    }

    #[test]
    fn test_whitespace_variants_resolve_identically() {
        let vars = values(&[("k", "V")]);
        for text in ["{{.k}}", "{{ .k }}", "{{.k }}", "{{ .k}}", "{{\t. k\n}}"] {
            assert_eq!(resolve(text, &vars, OnMissing::Preserve), "V", "{}", text);
        }
    }

    #[test]
    fn test_malformed_tokens_pass_through() {
        let vars = values(&[("name", "X")]);
        let text = "{{name}} {{.na-me}} {.name} {{.}} {{.name}";
        assert_eq!(resolve(text, &vars, OnMissing::Empty), text);
    }

    #[test]
    fn test_no_recursive_expansion() {
        let vars = values(&[("a", "{{.b}}"), ("b", "nope")]);
        assert_eq!(resolve("[{{.a}}]", &vars, OnMissing::Empty), "[{{.b}}]");
    }

    #[test]
    fn test_idempotent_when_values_have_no_tokens() {
        let vars = values(&[("firstName", "Jane")]);
        let once = resolve(ORDER, &vars, OnMissing::Empty);
        assert_eq!(resolve(&once, &vars, OnMissing::Empty), once);
    }

    #[test]
    fn test_repeated_and_unicode_text_preserved() {
        let vars = values(&[("n", "Åsa")]);
        assert_eq!(
            resolve("héllo {{.n}} · {{.n}} ✓", &vars, OnMissing::Empty),
            "héllo Åsa · Åsa ✓"
        );
    }

    #[test]
    fn test_values_from_json_coercion() {
        let data = json!({
            "s": "text",
            "n": 42,
            "f": 1.5,
            "b": true,
            "z": null,
            "a": [1, 2]
        });
        let vars = values_from_json(data.as_object().unwrap());
        assert_eq!(vars["s"], "text");
        assert_eq!(vars["n"], "42");
        assert_eq!(vars["f"], "1.5");
        assert_eq!(vars["b"], "true");
        assert_eq!(vars["z"], "");
        assert_eq!(vars["a"], "[1,2]");
    }

    #[test]
    fn test_null_value_is_empty_even_when_preserving() {
        let data = json!({"status": null});
        let vars = values_from_json(data.as_object().unwrap());
        assert_eq!(resolve("[{{.status}}]", &vars, OnMissing::Preserve), "[]");
    }

    #[test]
    fn test_extract_placeholders_distinct_in_order() {
        let keys = extract_placeholders("{{.b}} {{ .a }} {{.b}} {{c}} {{.c_1}}");
        assert_eq!(keys, vec!["b", "a", "c_1"]);
    }

    #[test]
    fn test_rename_placeholder() {
        let body = "Hi {{.first}} / {{ .first }} / {{.firstName}} / {{.other}}";
        assert_eq!(
            rename_placeholder(body, "first", "given"),
            "Hi {{.given}} / {{.given}} / {{.firstName}} / {{.other}}"
        );
    }

    #[test]
    fn test_format_variable_key() {
        assert_eq!(format_variable_key("  First Name "), "firstName");
        assert_eq!(format_variable_key("Order #Number!"), "orderNumber");
        assert_eq!(format_variable_key("1stPlace"), "stPlace");
        assert_eq!(format_variable_key("!!!"), "");
    }

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("firstName"));
        assert!(is_valid_key("order_2"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("first name"));
        assert!(!is_valid_key(&"a".repeat(MAX_KEY_LENGTH + 1)));
    }

    #[test]
    fn test_on_missing_serde() {
        assert_eq!(serde_json::to_string(&OnMissing::Preserve).unwrap(), "\"preserve\"");
        let parsed: OnMissing = serde_json::from_str("\"empty\"").unwrap();
        assert_eq!(parsed, OnMissing::Empty);
        assert_eq!(OnMissing::default(), OnMissing::Empty);
    }
}
