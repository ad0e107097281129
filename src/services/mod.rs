pub mod llm;
pub mod prediction;

pub use prediction::PredictionService;
