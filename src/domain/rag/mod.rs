//! Retrieval-augmented generation

mod pipeline;
mod prompt;

pub use pipeline::{RagAnswer, RagOptions, RagPipeline};
pub use prompt::{build_prompt, format_history, format_passages};
