pub mod answer;
pub mod config;
pub mod memory;
pub mod services;
pub mod telemetry;

pub use answer::{Intent, PredictionRequest, PredictionResponse, Predictor};
pub use config::ServiceConfig;
pub use services::PredictionService;
