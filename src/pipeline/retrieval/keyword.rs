use std::collections::HashSet;

use super::library::ProtocolLibrary;
use super::types::{ProtocolRetriever, RetrievalStrategy};
use super::RetrievalError;
use crate::models::{ProtocolEntry, ProtocolMatch};

pub const DEFAULT_MAX_MATCHES: usize = 3;

/// Lexical retrieval over the protocol library.
pub struct KeywordRetriever {
    library: ProtocolLibrary,
    max_matches: usize,
}

impl KeywordRetriever {
    pub fn new(library: ProtocolLibrary) -> Self {
        Self::with_max_matches(library, DEFAULT_MAX_MATCHES)
    }

    pub fn with_max_matches(library: ProtocolLibrary, max_matches: usize) -> Self {
        Self {
            library,
            max_matches,
        }
    }
}

/// A symptom hits an entry when it appears in the condition name, or
/// names one of the entry's keywords.
fn matches_entry(symptom: &str, entry: &ProtocolEntry) -> bool {
    if entry.condition.to_lowercase().contains(symptom) {
        return true;
    }
    entry.keywords.iter().any(|k| {
        let k = k.trim().to_lowercase();
        !k.is_empty() && (symptom == k || symptom.contains(&k))
    })
}

impl ProtocolRetriever for KeywordRetriever {
    fn retrieve(&self, symptom_names: &[String]) -> Result<Vec<ProtocolMatch>, RetrievalError> {
        let mut seen = HashSet::new();
        let mut matches = Vec::new();

        'symptoms: for name in symptom_names {
            let symptom = name.trim().to_lowercase();
            if symptom.is_empty() {
                continue;
            }
            for entry in self.library.entries() {
                if matches.len() >= self.max_matches {
                    break 'symptoms;
                }
                if matches_entry(&symptom, entry) && seen.insert(entry.id.as_str()) {
                    matches.push(ProtocolMatch::from(entry));
                }
            }
        }

        Ok(matches)
    }

    fn strategy(&self) -> RetrievalStrategy {
        RetrievalStrategy::Keyword
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn retriever() -> KeywordRetriever {
        KeywordRetriever::new(ProtocolLibrary::builtin())
    }

    #[test]
    fn matches_condition_substring() {
        let matches = retriever().retrieve(&names(&["chest pain"])).unwrap();
        let conditions: Vec<&str> = matches.iter().map(|m| m.condition.as_str()).collect();
        assert_eq!(conditions, vec!["Chest Pain", "Acute Chest Pain"]);
    }

    #[test]
    fn matches_are_case_insensitive() {
        let matches = retriever().retrieve(&names(&["FEVER"])).unwrap();
        assert!(!matches.is_empty());
        assert!(matches.iter().all(|m| m.condition.contains("Fever")));
    }

    #[test]
    fn matches_keywords() {
        let matches = retriever().retrieve(&names(&["nausea"])).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].condition, "Severe Abdominal Pain");
    }

    #[test]
    fn symptom_containing_keyword_matches() {
        let matches = retriever().retrieve(&names(&["persistent vomiting"])).unwrap();
        assert_eq!(matches[0].condition, "Severe Abdominal Pain");
    }

    #[test]
    fn caps_at_max_matches() {
        let matches = retriever()
            .retrieve(&names(&["fever", "chest pain", "abdominal pain"]))
            .unwrap();
        assert_eq!(matches.len(), DEFAULT_MAX_MATCHES);
        assert!(matches.iter().all(|m| m.condition.contains("Fever")));
    }

    #[test]
    fn deduplicates_entries_across_symptoms() {
        let retriever = KeywordRetriever::with_max_matches(ProtocolLibrary::builtin(), 10);
        let matches = retriever.retrieve(&names(&["chest pain", "shortness of breath"])).unwrap();
        let acute = matches.iter().filter(|m| m.condition == "Acute Chest Pain").count();
        assert_eq!(acute, 1);
    }

    #[test]
    fn unknown_and_blank_symptoms_match_nothing() {
        assert!(retriever().retrieve(&names(&["itchy elbow", "  "])).unwrap().is_empty());
        assert!(retriever().retrieve(&[]).unwrap().is_empty());
    }

    #[test]
    fn reports_keyword_strategy() {
        assert_eq!(retriever().strategy(), RetrievalStrategy::Keyword);
    }
}
