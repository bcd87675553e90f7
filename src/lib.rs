//! Cellar Proxy - generative-AI backend for the wine cellar app
//!
//! This library forwards food-pairing prompts to an upstream generative-language
//! API and scans wine labels. Requests are normalized into one message form,
//! then tried against an ordered list of candidate models, falling back to
//! the next model only when upstream reports the model as not found.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{call_with_fallback, ModelResolver, PairingProxy};
pub use models::{ModelCandidateList, PairingRequest, ProviderKind, ProxyRequest, ProxyResult};
pub use routes::AppState;
