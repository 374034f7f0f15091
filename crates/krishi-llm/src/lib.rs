//! Language-model capability ports and clients.
//!
//! The advisory pipeline never talks to a model service directly; it goes
//! through the ports defined here, so tests substitute deterministic stubs
//! and the system keeps producing structured replies when the service is
//! down.

pub mod openai;
pub mod ports;
pub mod prompts;

pub use openai::OpenAiClient;
pub use ports::{IntentClassifier, SchemeGuide, TextRefiner};
