use serde::{Deserialize, Serialize};

/// A clinical protocol held by the knowledge base.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolEntry {
    pub id: String,
    pub condition: String,
    /// Symptom phrases that point to this protocol.
    #[serde(default)]
    pub keywords: Vec<String>,
    pub protocol: String,
    pub source: String,
}

impl ProtocolEntry {
    /// Text used to embed this entry for semantic search.
    pub fn document_text(&self) -> String {
        format!("{}: {}", self.condition, self.protocol)
    }
}

/// A protocol surfaced for one request. No identity beyond the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolMatch {
    pub condition: String,
    pub source: String,
    #[serde(rename = "protocol")]
    pub protocol_text: String,
}

impl ProtocolMatch {
    /// `"{source}: {condition}"`, as listed in the reasoning narrative.
    pub fn citation(&self) -> String {
        format!("{}: {}", self.source, self.condition)
    }
}

impl From<&ProtocolEntry> for ProtocolMatch {
    fn from(entry: &ProtocolEntry) -> Self {
        Self {
            condition: entry.condition.clone(),
            source: entry.source.clone(),
            protocol_text: entry.protocol.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fever_entry() -> ProtocolEntry {
        ProtocolEntry {
            id: "who_001".into(),
            condition: "Fever".into(),
            keywords: vec!["fever".into(), "chills".into()],
            protocol: "Ensure hydration and rest.".into(),
            source: "WHO Clinical Guidelines".into(),
        }
    }

    #[test]
    fn match_from_entry_copies_fields() {
        let m = ProtocolMatch::from(&fever_entry());
        assert_eq!(m.condition, "Fever");
        assert_eq!(m.protocol_text, "Ensure hydration and rest.");
        assert_eq!(m.citation(), "WHO Clinical Guidelines: Fever");
    }

    #[test]
    fn match_serializes_protocol_field() {
        let json = serde_json::to_value(ProtocolMatch::from(&fever_entry())).unwrap();
        assert_eq!(json["protocol"], "Ensure hydration and rest.");
        assert!(json.get("protocol_text").is_none());
    }

    #[test]
    fn entry_keywords_default_to_empty() {
        let entry: ProtocolEntry = serde_json::from_str(
            r#"{"id": "x", "condition": "Cough", "protocol": "Rest.", "source": "GP"}"#,
        )
        .unwrap();
        assert!(entry.keywords.is_empty());
        assert_eq!(entry.document_text(), "Cough: Rest.");
    }
}
