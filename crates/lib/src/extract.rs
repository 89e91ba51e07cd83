//! Tolerant JSON extraction for generative-model output.
//!
//! Model text is untrusted: it is frequently wrapped in markdown fences,
//! padded with prose, or truncated at a token limit. This module locates a
//! JSON value inside such text and applies a small repair pass (trailing
//! comma removal, closing of unbalanced brackets) before giving up. It is
//! intentionally not a JSON5 parser; it maximizes the chance of recovering
//! a usable value with a few cheap passes.

use crate::errors::OrchestratorError;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// The top-level JSON kind a caller expects to recover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Object,
    Array,
}

impl JsonKind {
    fn matches(self, value: &Value) -> bool {
        match self {
            JsonKind::Object => value.is_object(),
            JsonKind::Array => value.is_array(),
        }
    }

    fn delimiters(self) -> (char, char) {
        match self {
            JsonKind::Object => ('{', '}'),
            JsonKind::Array => ('[', ']'),
        }
    }
}

// Matches ```json ... ``` or ``` ... ``` holding an object or array span.
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)```(?:json)?\s*(\{.*\}|\[.*\])\s*```").expect("fence regex is valid")
});

/// Extracts a JSON value of the expected kind from arbitrary model text.
///
/// The passes run in order, first success wins:
///
/// 1. Direct parse of the trimmed input.
/// 2. The content of a markdown code fence, if one holds a JSON span.
/// 3. A greedy longest-match span from the first opening delimiter to the
///    last closing one (to the end of the text if truncation removed every
///    closing delimiter).
///
/// The fence or span candidate goes through [`repair`] before the final
/// parse attempt. On failure the returned
/// [`OrchestratorError::InvalidModelJson`] carries both the original text
/// and the repaired candidate so the caller can surface them.
///
/// Known limitation: only the first candidate span is considered, and the
/// greedy match can swallow trailing prose that happens to contain a
/// closing delimiter. Such input fails the final parse and is reported
/// rather than silently mangled.
pub fn extract_json(text: &str, kind: JsonKind) -> Result<Value, OrchestratorError> {
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if kind.matches(&value) {
            return Ok(value);
        }
    }

    let candidate = find_fenced(trimmed)
        .or_else(|| find_span(trimmed, kind))
        .unwrap_or(trimmed);

    let repaired = repair(candidate);
    match serde_json::from_str::<Value>(&repaired) {
        Ok(value) if kind.matches(&value) => Ok(value),
        _ => Err(OrchestratorError::InvalidModelJson {
            raw: text.to_string(),
            repaired,
        }),
    }
}

/// Returns the JSON span inside the first markdown code fence, if any.
fn find_fenced(text: &str) -> Option<&str> {
    FENCE_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

/// Returns the greedy span from the first opening delimiter to the last
/// closing one. When no closing delimiter follows the opener (a truncated
/// response), the span runs to the end of the text and the repair pass
/// closes it.
fn find_span(text: &str, kind: JsonKind) -> Option<&str> {
    let (open, close) = kind.delimiters();
    let start = text.find(open)?;
    let end = match text.rfind(close) {
        Some(e) if e > start => e + close.len_utf8(),
        _ => text.len(),
    };
    Some(&text[start..end])
}

/// Repairs a candidate span: strips trailing whitespace, drops a single
/// trailing comma, closes a string literal left open by truncation, and
/// appends closing delimiters for every unmatched opener in reverse
/// nesting order.
///
/// Mismatched closers already present in the text are left alone; the
/// final parse catches anything this pass cannot fix.
fn repair(candidate: &str) -> String {
    let mut repaired = candidate.trim_end().to_string();
    if repaired.ends_with(',') {
        repaired.pop();
    }

    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    for c in repaired.chars() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => stack.push('}'),
            '[' => stack.push(']'),
            '}' | ']' => {
                if stack.last() == Some(&c) {
                    stack.pop();
                }
            }
            _ => {}
        }
    }

    if in_string {
        repaired.push('"');
    }
    while let Some(closer) = stack.pop() {
        repaired.push(closer);
    }

    repaired
}
