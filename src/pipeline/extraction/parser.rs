use serde::Deserialize;

use super::ExtractionError;
use crate::models::{SymptomRecord, SymptomSeverity};

/// Parse the model's reply into symptom records.
///
/// Accepts `{"symptoms": [...]}` or a bare array, optionally wrapped in
/// code fences or surrounded by prose. Items that do not look like a
/// symptom are skipped rather than failing the whole reply.
pub fn parse_symptom_response(response: &str) -> Result<Vec<SymptomRecord>, ExtractionError> {
    let items = match locate_json(response)? {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("symptoms") {
            Some(serde_json::Value::Array(items)) => items,
            Some(serde_json::Value::Null) | None => vec![],
            Some(other) => {
                return Err(ExtractionError::MalformedResponse(format!(
                    "\"symptoms\" is not an array: {other}"
                )))
            }
        },
        other => {
            return Err(ExtractionError::MalformedResponse(format!(
                "expected object or array, got {other}"
            )))
        }
    };

    Ok(parse_items_lenient(&items))
}

/// Find the JSON value the model meant as its answer.
///
/// Every `{` or `[` is a candidate start; the first one that parses into
/// an array or a `symptoms` object wins. Brackets in surrounding prose
/// ("Symptoms [as requested]: {...}") are skipped. Falls back to the first
/// object that parsed at all.
fn locate_json(response: &str) -> Result<serde_json::Value, ExtractionError> {
    let body = strip_code_fence(response);
    let mut fallback = None;
    let mut first_error = None;

    for (start, _) in body.match_indices(['{', '[']) {
        let mut stream =
            serde_json::Deserializer::from_str(&body[start..]).into_iter::<serde_json::Value>();
        match stream.next() {
            Some(Ok(value)) => {
                if value.is_array() || value.get("symptoms").is_some() {
                    return Ok(value);
                }
                fallback.get_or_insert(value);
            }
            Some(Err(e)) => {
                first_error.get_or_insert_with(|| e.to_string());
            }
            None => {}
        }
    }

    match (fallback, first_error) {
        (Some(value), _) => Ok(value),
        (None, Some(e)) => Err(ExtractionError::JsonParsing(e)),
        (None, None) => Err(ExtractionError::MalformedResponse("No JSON found".into())),
    }
}

fn strip_code_fence(response: &str) -> &str {
    let Some(fence) = response.find("```") else {
        return response;
    };
    let after = &response[fence + 3..];
    // Skip an optional language tag on the fence line.
    let content = after
        .strip_prefix("json")
        .unwrap_or(after);
    match content.find("```") {
        Some(end) => &content[..end],
        None => content,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSymptom {
    Full {
        name: String,
        #[serde(default)]
        severity: Option<serde_json::Value>,
        #[serde(default)]
        duration: Option<serde_json::Value>,
    },
    Bare(String),
}

fn parse_items_lenient(items: &[serde_json::Value]) -> Vec<SymptomRecord> {
    items
        .iter()
        .filter_map(|v| serde_json::from_value::<RawSymptom>(v.clone()).ok())
        .filter_map(|raw| {
            let (name, severity, duration) = match raw {
                RawSymptom::Full {
                    name,
                    severity,
                    duration,
                } => (name, severity_label(severity), duration.and_then(duration_text)),
                RawSymptom::Bare(name) => (name, SymptomSeverity::Unknown, None),
            };
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some(SymptomRecord {
                name: name.to_string(),
                severity,
                duration,
            })
        })
        .collect()
}

/// Anything other than a known string label grades as `Unknown`, so a
/// numeric or nested severity never costs us the symptom itself.
fn severity_label(value: Option<serde_json::Value>) -> SymptomSeverity {
    match value {
        Some(serde_json::Value::String(label)) => SymptomSeverity::from_label(&label),
        _ => SymptomSeverity::Unknown,
    }
}

/// Models sometimes emit numbers or the string "null" for duration.
fn duration_text(value: serde_json::Value) -> Option<String> {
    let text = match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("null") || text.eq_ignore_ascii_case("unknown") {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_symptoms_object() {
        let response = r#"{"symptoms": [
            {"name": "fever", "severity": "moderate", "duration": "2 days"},
            {"name": "cough", "severity": "mild", "duration": null}
        ]}"#;
        let symptoms = parse_symptom_response(response).unwrap();
        assert_eq!(symptoms.len(), 2);
        assert_eq!(symptoms[0].name, "fever");
        assert_eq!(symptoms[0].severity, SymptomSeverity::Moderate);
        assert_eq!(symptoms[0].duration.as_deref(), Some("2 days"));
        assert_eq!(symptoms[1].duration, None);
    }

    #[test]
    fn parses_bare_array_in_code_fence() {
        let response = "Here you go:\n```json\n[{\"name\": \"headache\", \"severity\": \"Severe\"}]\n```";
        let symptoms = parse_symptom_response(response).unwrap();
        assert_eq!(symptoms.len(), 1);
        assert_eq!(symptoms[0].severity, SymptomSeverity::Severe);
    }

    #[test]
    fn plain_string_items_become_unknown_severity() {
        let symptoms = parse_symptom_response(r#"{"symptoms": ["nausea"]}"#).unwrap();
        assert_eq!(symptoms, vec![SymptomRecord::new("nausea", SymptomSeverity::Unknown, None)]);
    }

    #[test]
    fn skips_malformed_and_blank_items() {
        let response = r#"{"symptoms": [
            {"name": "  "},
            {"severity": "severe"},
            42,
            {"name": " dizziness ", "severity": "extreme", "duration": "null"}
        ]}"#;
        let symptoms = parse_symptom_response(response).unwrap();
        assert_eq!(symptoms.len(), 1);
        assert_eq!(symptoms[0].name, "dizziness");
        assert_eq!(symptoms[0].severity, SymptomSeverity::Unknown);
        assert_eq!(symptoms[0].duration, None);
    }

    #[test]
    fn empty_symptom_list_is_ok() {
        assert!(parse_symptom_response(r#"{"symptoms": []}"#).unwrap().is_empty());
        assert!(parse_symptom_response(r#"{}"#).unwrap().is_empty());
    }

    #[test]
    fn no_json_is_malformed() {
        assert!(matches!(
            parse_symptom_response("I cannot help with that."),
            Err(ExtractionError::MalformedResponse(_))
        ));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        assert!(matches!(
            parse_symptom_response(r#"{"symptoms": [{"name": "fever",]}"#),
            Err(ExtractionError::JsonParsing(_))
        ));
    }

    #[test]
    fn non_string_severity_keeps_the_symptom() {
        let symptoms = parse_symptom_response(
            r#"{"symptoms": [
                {"name": "chest pain", "severity": 3},
                {"name": "fever", "severity": {"level": "high"}},
                {"name": "cough", "severity": true}
            ]}"#,
        )
        .unwrap();
        assert_eq!(symptoms.len(), 3);
        assert_eq!(symptoms[0], SymptomRecord::new("chest pain", SymptomSeverity::Unknown, None));
        assert!(symptoms.iter().all(|s| s.severity == SymptomSeverity::Unknown));
    }

    #[test]
    fn bracketed_prose_before_json_is_skipped() {
        let symptoms = parse_symptom_response(
            r#"Symptoms [as requested]: {"symptoms":[{"name":"chest pain","severity":"severe"}]}"#,
        )
        .unwrap();
        assert_eq!(symptoms, vec![SymptomRecord::new("chest pain", SymptomSeverity::Severe, None)]);
    }

    #[test]
    fn trailing_prose_after_json_is_ignored() {
        let symptoms = parse_symptom_response(
            r#"{"symptoms": [{"name": "nausea", "severity": "mild"}]} Let me know {if} you need more."#,
        )
        .unwrap();
        assert_eq!(symptoms.len(), 1);
        assert_eq!(symptoms[0].severity, SymptomSeverity::Mild);
    }

    #[test]
    fn non_array_symptoms_is_malformed() {
        assert!(matches!(
            parse_symptom_response(r#"{"symptoms": "fever"}"#),
            Err(ExtractionError::MalformedResponse(_))
        ));
    }
}
