use super::reference::SafetyReference;
use crate::models::{AlertKind, SafetyAlert};

/// Evaluates medication–medication and medication–condition risks.
pub struct SafetyChecker {
    reference: SafetyReference,
}

impl SafetyChecker {
    pub fn new(reference: SafetyReference) -> Self {
        Self { reference }
    }

    /// Check a medication list against itself and against existing conditions.
    ///
    /// Drug–drug alerts come first in pair enumeration order, then
    /// drug–condition alerts in medication-then-condition order.
    /// Alerts are not deduplicated across the two passes.
    pub fn check_interactions(
        &self,
        medications: &[String],
        conditions: &[String],
    ) -> Vec<SafetyAlert> {
        let meds = normalize_all(medications);
        let conditions = normalize_all(conditions);

        let mut alerts = self.drug_drug_alerts(&meds);
        alerts.extend(self.drug_condition_alerts(&meds, &conditions));
        alerts
    }

    fn drug_drug_alerts(&self, meds: &[String]) -> Vec<SafetyAlert> {
        let mut alerts = Vec::new();
        for (i, med_a) in meds.iter().enumerate() {
            for med_b in &meds[i + 1..] {
                if med_a == med_b {
                    continue;
                }
                for rule in self.reference.interactions_between(med_a, med_b) {
                    alerts.push(SafetyAlert::new(
                        AlertKind::DrugInteraction,
                        rule.severity,
                        &rule.risk,
                        [med_a.clone(), med_b.clone()],
                    ));
                }
            }
        }
        alerts
    }

    fn drug_condition_alerts(&self, meds: &[String], conditions: &[String]) -> Vec<SafetyAlert> {
        let mut alerts = Vec::new();
        for med in meds {
            for condition in conditions {
                for rule in self.reference.contraindications_for(med) {
                    if rule.applies_to_condition(condition) {
                        alerts.push(SafetyAlert::new(
                            AlertKind::Contraindication,
                            rule.severity,
                            &rule.risk,
                            [med.clone(), condition.clone()],
                        ));
                    }
                }
            }
        }
        alerts
    }
}

impl Default for SafetyChecker {
    fn default() -> Self {
        Self::new(SafetyReference::builtin())
    }
}

/// Trim and capitalize a drug or condition name ("  wARFARIN " -> "Warfarin").
pub fn normalize_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(|c| c.to_lowercase()))
            .collect(),
        None => String::new(),
    }
}

fn normalize_all(names: &[String]) -> Vec<String> {
    names
        .iter()
        .map(|n| normalize_name(n))
        .filter(|n| !n.is_empty())
        .collect()
}
