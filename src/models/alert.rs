use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::enums::{AlertKind, AlertSeverity};

/// A warning about a hazardous medication combination or a
/// medication/condition contraindication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyAlert {
    pub severity: AlertSeverity,
    pub risk: String,
    /// Drug and/or condition names, as normalized by the safety checker.
    pub involved_entities: BTreeSet<String>,
    pub kind: AlertKind,
}

impl SafetyAlert {
    pub fn new(
        kind: AlertKind,
        severity: AlertSeverity,
        risk: &str,
        entities: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            severity,
            risk: risk.to_string(),
            involved_entities: entities.into_iter().collect(),
            kind,
        }
    }
}
