pub mod alert;
pub mod enums;
pub mod protocol;
pub mod symptom;
pub mod triage;

pub use alert::*;
pub use enums::*;
pub use protocol::*;
pub use symptom::*;
pub use triage::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
