use std::path::Path;

use serde::{Deserialize, Serialize};

use super::SafetyError;
use crate::models::AlertSeverity;

/// Hazardous combination of two drugs. The pair is unordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRule {
    pub drug_a: String,
    pub drug_b: String,
    pub risk: String,
    pub severity: AlertSeverity,
}

impl InteractionRule {
    /// Whether this rule covers the pair, in either order, ignoring case.
    pub fn involves(&self, first: &str, second: &str) -> bool {
        let a = self.drug_a.to_lowercase();
        let b = self.drug_b.to_lowercase();
        let first = first.to_lowercase();
        let second = second.to_lowercase();
        (a == first && b == second) || (a == second && b == first)
    }
}

/// A drug that should be avoided with a condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContraindicationRule {
    pub drug: String,
    /// Matched as a case-insensitive substring of the patient's condition.
    pub condition: String,
    pub risk: String,
    pub severity: AlertSeverity,
}

impl ContraindicationRule {
    pub fn applies_to_condition(&self, condition: &str) -> bool {
        condition
            .to_lowercase()
            .contains(&self.condition.to_lowercase())
    }
}

/// Interaction and contraindication tables used by the safety checker
/// (loaded from interactions.json).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafetyReference {
    #[serde(default)]
    pub interactions: Vec<InteractionRule>,
    #[serde(default)]
    pub contraindications: Vec<ContraindicationRule>,
}

impl SafetyReference {
    pub const FILE_NAME: &'static str = "interactions.json";

    /// Load reference data from a JSON file in `data_dir`.
    pub fn load(data_dir: &Path) -> Result<Self, SafetyError> {
        let path = data_dir.join(Self::FILE_NAME);
        let json = std::fs::read_to_string(&path).map_err(|e| {
            SafetyError::ReferenceDataLoad(path.display().to_string(), e.to_string())
        })?;
        serde_json::from_str(&json)
            .map_err(|e| SafetyError::ReferenceDataParse(Self::FILE_NAME.into(), e.to_string()))
    }

    /// Load from `data_dir` when the file exists, otherwise use the bundled tables.
    pub fn load_or_builtin(data_dir: &Path) -> Result<Self, SafetyError> {
        if data_dir.join(Self::FILE_NAME).is_file() {
            let reference = Self::load(data_dir)?;
            tracing::info!(
                interactions = reference.interactions.len(),
                contraindications = reference.contraindications.len(),
                "Loaded safety reference data from {}",
                data_dir.display()
            );
            Ok(reference)
        } else {
            tracing::debug!("No {} in {}, using bundled rules", Self::FILE_NAME, data_dir.display());
            Ok(Self::builtin())
        }
    }

    /// Bundled rules.
    pub fn builtin() -> Self {
        Self {
            interactions: vec![
                InteractionRule {
                    drug_a: "Aspirin".into(),
                    drug_b: "Ibuprofen".into(),
                    risk: "Increased risk of stomach ulcers and bleeding".into(),
                    severity: AlertSeverity::High,
                },
                InteractionRule {
                    drug_a: "Warfarin".into(),
                    drug_b: "Aspirin".into(),
                    risk: "High risk of bleeding from combined anticoagulant and antiplatelet effect"
                        .into(),
                    severity: AlertSeverity::Critical,
                },
            ],
            contraindications: vec![
                ContraindicationRule {
                    drug: "Ibuprofen".into(),
                    condition: "Asthma".into(),
                    risk: "May trigger asthma attacks or bronchospasm (NSAID sensitivity)".into(),
                    severity: AlertSeverity::Moderate,
                },
                ContraindicationRule {
                    drug: "Warfarin".into(),
                    condition: "Ulcer".into(),
                    risk: "Risk of internal bleeding".into(),
                    severity: AlertSeverity::Critical,
                },
            ],
        }
    }

    /// Interaction rules covering the unordered pair.
    pub fn interactions_between<'a>(
        &'a self,
        first: &'a str,
        second: &'a str,
    ) -> impl Iterator<Item = &'a InteractionRule> + 'a {
        self.interactions
            .iter()
            .filter(move |rule| rule.involves(first, second))
    }

    /// Contraindication rules for a drug.
    pub fn contraindications_for<'a>(
        &'a self,
        drug: &'a str,
    ) -> impl Iterator<Item = &'a ContraindicationRule> + 'a {
        let drug = drug.to_lowercase();
        self.contraindications
            .iter()
            .filter(move |rule| rule.drug.to_lowercase() == drug)
    }
}
