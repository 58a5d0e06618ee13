//! Interpretation of the evaluator's reply.
//!
//! The model is asked for a three-field JSON object but nothing forces it to
//! comply. `interpret_response` never fails: it yields `Evaluation::Structured`
//! when the reply has the requested shape and `Evaluation::RawText` otherwise,
//! carrying the reply byte-for-byte.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The structured ATS result requested from the model.
///
/// Accepts the keys named in the prompt (`"JD Match"`, ...) as well as the
/// snake_case field names it serializes to. Unknown fields are rejected, so any
/// JSON that is not exactly these three fields is shown as raw text instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AtsReport {
    /// Percentage-formatted string, e.g. "85%".
    #[serde(rename(deserialize = "JD Match"), alias = "match_percentage")]
    pub match_percentage: String,
    #[serde(rename(deserialize = "Missing Keywords"), alias = "missing_keywords")]
    pub missing_keywords: Vec<String>,
    #[serde(rename(deserialize = "Profile Summary"), alias = "profile_summary")]
    pub profile_summary: String,
}

/// Outcome of one evaluation as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Evaluation {
    Structured { result: AtsReport },
    RawText { text: String },
}

/// How hard to look for the structured result inside the reply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// One parse attempt over the whole reply.
    #[default]
    Strict,
    /// Also try inside Markdown code fences, then the first balanced `{...}` block.
    Lenient,
}

impl ParseMode {
    pub fn from_lenient_flag(lenient: bool) -> Self {
        if lenient {
            ParseMode::Lenient
        } else {
            ParseMode::Strict
        }
    }
}

/// Turns the raw reply into an `Evaluation`. Parse failures are not errors.
pub fn interpret_response(raw: &str, mode: ParseMode) -> Evaluation {
    let parsed = match mode {
        ParseMode::Strict => parse_report(raw),
        ParseMode::Lenient => parse_report(raw)
            .or_else(|| parse_report(strip_json_fences(raw)))
            .or_else(|| first_json_object(raw).and_then(parse_report)),
    };

    match parsed {
        Some(result) => Evaluation::Structured { result },
        None => {
            debug!(
                "Evaluator reply is not a structured report ({} chars), showing raw text",
                raw.len()
            );
            Evaluation::RawText {
                text: raw.to_string(),
            }
        }
    }
}

fn parse_report(text: &str) -> Option<AtsReport> {
    serde_json::from_str(text).ok()
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));

    match inner {
        Some(stripped) => stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start()),
        None => text,
    }
}

/// Finds the first balanced `{...}` block, ignoring braces inside JSON strings.
fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}
