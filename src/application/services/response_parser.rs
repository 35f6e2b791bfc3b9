use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

/// Bounded preview of the raw text kept in the terminal error mapping.
const RAW_PREVIEW_CHARS: usize = 500;

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?si)```(?:json)?\s*(.+?)\s*```").unwrap());

/// Brace-delimited substrings with at most one level of nested braces.
static BRACE_CANDIDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^{}]*(?:\{[^{}]*\}[^{}]*)*\}").unwrap());

static BRACKETED_ARRAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\[(.*?)\]").unwrap());

static KEY_VALUE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"([^"]+)"\s*:\s*(?:\[(.*?)\]|"([^"]*)"|\{(.*?)\}|(-?\d+(?:\.\d+)?))"#)
        .unwrap()
});

/// Ordered fallback chain for recovering structured data from model output.
/// Each strategy is a pure function tried in fixed order; the first to yield
/// a mapping wins.
static STRATEGIES: &[(&str, fn(&str) -> Option<Map<String, Value>>)] = &[
    ("direct", parse_direct),
    ("fenced_block", parse_fenced_block),
    ("brace_scan", parse_brace_scan),
    ("bracketed_array", parse_bracketed_array),
    ("key_value_scan", parse_key_value_pairs),
];

/// Converts an arbitrary model response into a mapping. Total: always
/// returns a mapping, worst case an error structure carrying a bounded
/// preview of the raw text.
pub fn parse_model_response(content: &str) -> Map<String, Value> {
    for (name, strategy) in STRATEGIES {
        if let Some(parsed) = strategy(content) {
            tracing::debug!(strategy = name, fields = parsed.len(), "Model response parsed");
            return parsed;
        }
    }

    tracing::warn!(
        preview = truncate_chars(content, 200),
        "Could not parse model response into valid JSON structure"
    );
    let mut fallback = Map::new();
    fallback.insert(
        "error".to_string(),
        Value::String("Could not parse AI response into valid JSON structure".to_string()),
    );
    fallback.insert(
        "raw_response".to_string(),
        Value::String(truncate_chars(content, RAW_PREVIEW_CHARS).to_string()),
    );
    fallback
}

/// Strict parse of the trimmed text. Non-object JSON is wrapped under a
/// `data` key so the result is still a mapping.
fn parse_direct(content: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(content.trim()).ok()? {
        Value::Object(map) => Some(map),
        other => {
            let mut wrapped = Map::new();
            wrapped.insert("data".to_string(), other);
            Some(wrapped)
        }
    }
}

/// Strict-parses the contents of the first fenced code block
/// (```json ... ``` or ``` ... ```). Only object contents are accepted;
/// arrays fall through to the bracketed-array strategy.
fn parse_fenced_block(content: &str) -> Option<Map<String, Value>> {
    let captures = FENCED_BLOCK.captures(content)?;
    let block = captures.get(1)?.as_str();
    match serde_json::from_str::<Value>(block).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Tries brace-delimited candidates from longest to shortest, accepting the
/// first that parses to a non-empty object. Candidates preceded by an
/// unmatched `{` or `[` are fragments of a larger truncated structure and
/// are skipped.
fn parse_brace_scan(content: &str) -> Option<Map<String, Value>> {
    let mut candidates: Vec<&str> = BRACE_CANDIDATE
        .find_iter(content)
        .filter(|m| !inside_open_structure(&content[..m.start()]))
        .map(|m| m.as_str())
        .collect();
    candidates.sort_by_key(|c| std::cmp::Reverse(c.len()));

    for candidate in candidates {
        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(candidate) {
            if !map.is_empty() {
                return Some(map);
            }
        }
    }
    None
}

/// A single parseable bracketed array is wrapped as `extracted_items`.
fn parse_bracketed_array(content: &str) -> Option<Map<String, Value>> {
    let captures = BRACKETED_ARRAY.captures(content)?;
    let array_text = format!("[{}]", captures.get(1)?.as_str());
    match serde_json::from_str::<Value>(&array_text).ok()? {
        Value::Array(items) => {
            let mut wrapped = Map::new();
            wrapped.insert("extracted_items".to_string(), Value::Array(items));
            Some(wrapped)
        }
        _ => None,
    }
}

/// Reconstructs a mapping from `"key": value` pairs where the value is an
/// array, quoted string, nested object, or number. Array and object values
/// get a secondary comma-split fallback when the sub-parse fails. Skipped
/// entirely when the text has unbalanced braces or brackets; pairs found
/// inside a truncated structure are fragments, not top-level fields.
fn parse_key_value_pairs(content: &str) -> Option<Map<String, Value>> {
    if inside_open_structure(content) {
        return None;
    }

    let mut result = Map::new();
    for captures in KEY_VALUE_PAIR.captures_iter(content) {
        let key = captures.get(1)?.as_str().to_string();

        let value = if let Some(array_body) = captures.get(2) {
            parse_array_value(array_body.as_str())
        } else if let Some(object_body) = captures.get(4) {
            parse_object_value(object_body.as_str())
        } else if let Some(number) = captures.get(5) {
            parse_number_value(number.as_str())
        } else {
            Value::String(captures.get(3).map_or("", |m| m.as_str()).to_string())
        };

        result.insert(key, value);
    }

    if result.is_empty() { None } else { Some(result) }
}

fn parse_array_value(body: &str) -> Value {
    let wrapped = format!("[{body}]");
    serde_json::from_str(&wrapped).unwrap_or_else(|_| {
        let items: Vec<Value> = body
            .split(',')
            .map(|item| item.trim().trim_matches(['"', '\'']))
            .filter(|item| !item.is_empty())
            .map(|item| Value::String(item.to_string()))
            .collect();
        Value::Array(items)
    })
}

fn parse_object_value(body: &str) -> Value {
    let wrapped = format!("{{{body}}}");
    serde_json::from_str(&wrapped).unwrap_or_else(|_| {
        let mut fallback = Map::new();
        fallback.insert(
            "value".to_string(),
            Value::String(body.trim().to_string()),
        );
        Value::Object(fallback)
    })
}

fn parse_number_value(text: &str) -> Value {
    if text.contains('.') {
        text.parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(text.to_string()))
    } else {
        text.parse::<i64>()
            .map(|n| Value::Number(n.into()))
            .unwrap_or_else(|_| Value::String(text.to_string()))
    }
}

/// True when the text carries more opening `{`/`[` than closing ones, i.e.
/// what follows is nested inside an unterminated structure.
fn inside_open_structure(text: &str) -> bool {
    let mut braces = 0i64;
    let mut brackets = 0i64;
    for ch in text.chars() {
        match ch {
            '{' => braces += 1,
            '}' => braces -= 1,
            '[' => brackets += 1,
            ']' => brackets -= 1,
            _ => {}
        }
    }
    braces > 0 || brackets > 0
}

/// Character-based truncation that never splits a code point.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
