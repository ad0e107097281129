pub mod client;
pub mod prompt;

pub use client::{BedrockClient, InferenceClient, InferenceError};
pub use prompt::build_prompt;
