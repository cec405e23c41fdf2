// Interview engine: skill catalog, question generation, answer evaluation,
// the stage machine, and the session-level service the handlers call.
// All LLM calls go through llm_client.

pub mod conversation;
pub mod evaluator;
pub mod flow;
pub mod handlers;
pub mod prompts;
pub mod questions;
pub mod resume;
pub mod service;
pub mod skills;
pub mod summary;
pub mod validation;
