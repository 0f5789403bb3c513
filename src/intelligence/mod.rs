pub mod engine;
pub mod escalation;
pub mod messages;
pub mod red_flags;
pub mod reference;
pub mod safety;

pub use engine::TriageEngine;
pub use escalation::{decide_level, EscalationReason, LevelDecision};
pub use red_flags::detect_red_flags;
pub use reference::SafetyReference;
pub use safety::SafetyChecker;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SafetyError {
    #[error("Failed to read safety reference data {0}: {1}")]
    ReferenceDataLoad(String, String),

    #[error("Failed to parse safety reference data {0}: {1}")]
    ReferenceDataParse(String, String),
}
