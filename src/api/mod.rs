//! HTTP surface for the triage pipeline.
//!
//! `GET /` and `GET /health` report service status; `POST /analyze` runs
//! extraction and the triage decision for one request. Every route sits
//! behind request logging and permissive CORS.

pub mod endpoints;
pub mod error;
pub mod formatter;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_server, ApiServer};
pub use types::ApiContext;
