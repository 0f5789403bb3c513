use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
/// Variant order defines the `Ord` ranking (lowest first).
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(TriageLevel {
    SelfCare => "SELF_CARE",
    Routine => "ROUTINE",
    Urgent => "URGENT",
    Emergency => "EMERGENCY",
});

impl TriageLevel {
    /// Raise the level to at least `target`. Never lowers it.
    pub fn escalate_to(self, target: TriageLevel) -> TriageLevel {
        self.max(target)
    }
}

str_enum!(AlertSeverity {
    Low => "LOW",
    Moderate => "MODERATE",
    High => "HIGH",
    Critical => "CRITICAL",
});

impl AlertSeverity {
    /// HIGH and CRITICAL alerts can lift a ROUTINE assessment to URGENT.
    pub fn escalates_triage(&self) -> bool {
        *self >= AlertSeverity::High
    }
}

str_enum!(AlertKind {
    DrugInteraction => "drug_interaction",
    Contraindication => "contraindication",
});

str_enum!(PipelineWarning {
    ExtractionUnavailable => "extraction_unavailable",
    RetrievalDegraded => "retrieval_degraded",
});

str_enum!(RetrievalStrategy {
    Keyword => "keyword",
    Semantic => "semantic",
});

// ---------------------------------------------------------------------------
// SymptomSeverity
// ---------------------------------------------------------------------------

/// Severity grading attached to an extracted symptom.
///
/// Parsing is lenient: extraction output is model-generated, so any label
/// outside the known set becomes `Unknown` instead of failing the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SymptomSeverity {
    Mild,
    Moderate,
    Severe,
    #[default]
    Unknown,
}

impl SymptomSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
            Self::Unknown => "unknown",
        }
    }

    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "mild" => Self::Mild,
            "moderate" => Self::Moderate,
            "severe" => Self::Severe,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for SymptomSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SymptomSeverity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SymptomSeverity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label
            .as_deref()
            .map(Self::from_label)
            .unwrap_or(Self::Unknown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn triage_level_round_trip() {
        for (variant, s) in [
            (TriageLevel::Emergency, "EMERGENCY"),
            (TriageLevel::Urgent, "URGENT"),
            (TriageLevel::Routine, "ROUTINE"),
            (TriageLevel::SelfCare, "SELF_CARE"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(TriageLevel::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn triage_level_ordering() {
        assert!(TriageLevel::Emergency > TriageLevel::Urgent);
        assert!(TriageLevel::Urgent > TriageLevel::Routine);
        assert!(TriageLevel::Routine > TriageLevel::SelfCare);
    }

    #[test]
    fn escalate_never_lowers() {
        assert_eq!(
            TriageLevel::Emergency.escalate_to(TriageLevel::Urgent),
            TriageLevel::Emergency
        );
        assert_eq!(
            TriageLevel::Routine.escalate_to(TriageLevel::Urgent),
            TriageLevel::Urgent
        );
        assert_eq!(
            TriageLevel::Urgent.escalate_to(TriageLevel::Routine),
            TriageLevel::Urgent
        );
    }

    #[test]
    fn alert_severity_escalation_threshold() {
        assert!(!AlertSeverity::Low.escalates_triage());
        assert!(!AlertSeverity::Moderate.escalates_triage());
        assert!(AlertSeverity::High.escalates_triage());
        assert!(AlertSeverity::Critical.escalates_triage());
    }

    #[test]
    fn enums_serialize_to_wire_labels() {
        assert_eq!(
            serde_json::to_string(&TriageLevel::SelfCare).unwrap(),
            "\"SELF_CARE\""
        );
        assert_eq!(
            serde_json::to_string(&AlertSeverity::Critical).unwrap(),
            "\"CRITICAL\""
        );
        assert_eq!(
            serde_json::to_string(&PipelineWarning::RetrievalDegraded).unwrap(),
            "\"retrieval_degraded\""
        );
    }

    #[test]
    fn symptom_severity_parses_leniently() {
        assert_eq!(SymptomSeverity::from_label("Severe"), SymptomSeverity::Severe);
        assert_eq!(SymptomSeverity::from_label(" moderate "), SymptomSeverity::Moderate);
        assert_eq!(SymptomSeverity::from_label("excruciating"), SymptomSeverity::Unknown);

        let parsed: SymptomSeverity = serde_json::from_str("\"MILD\"").unwrap();
        assert_eq!(parsed, SymptomSeverity::Mild);
        let parsed: SymptomSeverity = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, SymptomSeverity::Unknown);
    }

    #[test]
    fn retrieval_strategy_parses() {
        assert_eq!(RetrievalStrategy::from_str("semantic").unwrap(), RetrievalStrategy::Semantic);
        assert_eq!(RetrievalStrategy::Keyword.to_string(), "keyword");
        assert!(RetrievalStrategy::from_str("fuzzy").is_err());
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(TriageLevel::from_str("critical").is_err());
        assert!(AlertSeverity::from_str("").is_err());
    }
}
