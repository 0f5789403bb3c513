use std::path::Path;

use super::RetrievalError;
use crate::models::ProtocolEntry;

/// The clinical knowledge base searched by the retrievers.
#[derive(Debug, Clone, Default)]
pub struct ProtocolLibrary {
    entries: Vec<ProtocolEntry>,
}

impl ProtocolLibrary {
    pub const FILE_NAME: &'static str = "protocols.json";

    pub fn new(entries: Vec<ProtocolEntry>) -> Self {
        Self { entries }
    }

    /// Load entries from `protocols.json` in `data_dir` (a JSON array).
    pub fn load(data_dir: &Path) -> Result<Self, RetrievalError> {
        let path = data_dir.join(Self::FILE_NAME);
        let json = std::fs::read_to_string(&path).map_err(|e| {
            RetrievalError::ReferenceDataLoad(path.display().to_string(), e.to_string())
        })?;
        let entries: Vec<ProtocolEntry> = serde_json::from_str(&json)
            .map_err(|e| RetrievalError::ReferenceDataParse(Self::FILE_NAME.into(), e.to_string()))?;
        Ok(Self { entries })
    }

    /// Load from `data_dir` when the file exists, otherwise use the bundled protocols.
    pub fn load_or_builtin(data_dir: &Path) -> Result<Self, RetrievalError> {
        if data_dir.join(Self::FILE_NAME).is_file() {
            let library = Self::load(data_dir)?;
            tracing::info!(
                protocols = library.len(),
                "Loaded protocol library from {}",
                data_dir.display()
            );
            Ok(library)
        } else {
            tracing::debug!("No {} in {}, using built-in protocols", Self::FILE_NAME, data_dir.display());
            Ok(Self::builtin())
        }
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            entry(
                "who_001",
                "Fever",
                &["fever", "chills", "body ache"],
                "Ensure hydration, rest, and monitor temperature. Use paracetamol if needed. Consult if fever persists > 3 days.",
                "WHO Clinical Guidelines",
            ),
            entry(
                "kb_002",
                "Chest Pain",
                &["chest pain", "chest tightness"],
                "Immediate ER triage recommended. Perform ECG. Administer Aspirin if no contraindications.",
                "WHO Emergency Guidelines",
            ),
            entry(
                "kb_003",
                "Abdominal Pain",
                &["abdominal pain", "stomach ache"],
                "Assess for rebound tenderness. Keep NPO. Routine surgical consult.",
                "Clinical Triage Manual",
            ),
            entry(
                "kb_004",
                "Fever",
                &["fever"],
                "Increase fluid intake. Paracetamol for fever >38.5C. Monitor for rash.",
                "General Practice Protocols",
            ),
            entry(
                "p1",
                "Acute Chest Pain",
                &["chest pain", "pressure", "shortness of breath", "radiating pain"],
                "Immediate ECG, oxygen if SpO2 < 94%, Aspirin 300mg. Triage to EMERGENCY.",
                "WHO Emergency Care",
            ),
            entry(
                "p2",
                "Severe Abdominal Pain",
                &["stomach pain", "abdominal pain", "nausea", "vomiting"],
                "NPO (Nothing by mouth), assess for surgical abdomen (rigidity/rebound). Triage to URGENT/EMERGENCY.",
                "Clinical Triage Manual",
            ),
            entry(
                "p3",
                "High Fever",
                &["fever", "chills", "high temperature"],
                "Check for neck stiffness/rash. Paracetamol for comfort. Hydration. Triage to ROUTINE/URGENT.",
                "WHO Pediatrics",
            ),
        ])
    }

    pub fn entries(&self) -> &[ProtocolEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn entry(id: &str, condition: &str, keywords: &[&str], protocol: &str, source: &str) -> ProtocolEntry {
    ProtocolEntry {
        id: id.into(),
        condition: condition.into(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        protocol: protocol.into(),
        source: source.into(),
    }
}
