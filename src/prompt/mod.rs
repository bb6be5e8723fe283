//! Remediation-hint generation: a persistent cache, deterministic
//! fallback templates, and the tiered generator that ties them together
//! with an external LLM call (§4.5).

pub mod cache;
mod generator;
mod templates;

pub use cache::PromptCache;
pub use generator::{generate, GenerationResult};
