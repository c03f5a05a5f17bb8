// Reaction generation engine.
// Implements: ratio allocation, guide formatting, prompt assembly, response
// decoding and the single-flight orchestrator.
// All upstream calls go through llm_client::TextGenerator.

pub mod assembler;
pub mod decoder;
pub mod distribution;
pub mod generator;
pub mod guide_format;
pub mod handlers;
pub mod progress;
pub mod prompts;
