// Resume analysis pipeline.
// Implements: file text extraction, input validation, prompt construction,
// response normalization, and the orchestration that ties them together.
// All model calls go through llm_client — no direct provider calls here.

pub mod extract;
pub mod handlers;
pub mod normalize;
pub mod pipeline;
pub mod prompts;
pub mod result;
pub mod validate;
