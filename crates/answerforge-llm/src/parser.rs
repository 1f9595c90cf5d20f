//! Parse generation-service output into question-answer pairs

use crate::GeneratorError;
use answerforge_domain::QaPair;
use serde_json::Value;
use tracing::warn;

/// Parse a model response into question-answer pairs
///
/// The response must be a JSON array of `{question, answer}` objects,
/// optionally wrapped in a markdown code fence. Malformed entries are
/// logged and skipped; only an unparseable response as a whole is an error.
pub fn parse_qa_response(response: &str) -> Result<Vec<QaPair>, GeneratorError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| GeneratorError::InvalidResponse(format!("JSON parse error: {}", e)))?;

    let entries = json
        .as_array()
        .ok_or_else(|| GeneratorError::InvalidResponse("expected a JSON array".to_string()))?;

    let mut pairs = Vec::new();
    for (idx, entry) in entries.iter().enumerate() {
        match parse_pair(entry) {
            Ok(pair) => pairs.push(pair),
            Err(e) => {
                warn!("skipping malformed pair {}: {}", idx, e);
            }
        }
    }

    Ok(pairs)
}

/// Extract JSON from a response, handling markdown code fences
fn extract_json(response: &str) -> Result<String, GeneratorError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(GeneratorError::InvalidResponse(
                "empty code block".to_string(),
            ));
        }
        // Skip the opening ``` / ```json line and the closing ``` line.
        Ok(lines[1..lines.len().saturating_sub(1)].join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Parse a single question-answer object
fn parse_pair(json: &Value) -> Result<QaPair, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "entry is not a JSON object".to_string())?;

    let question = obj
        .get("question")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "missing or empty 'question'".to_string())?;

    let answer = obj
        .get("answer")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "missing or empty 'answer'".to_string())?;

    Ok(QaPair::new(question, answer))
}
