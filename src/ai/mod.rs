//! All model inference functionality

pub mod client;
pub mod gateway;
pub mod pipeline;

// Re-export main types for convenience
pub use client::{HttpPipelineLoader, InferenceClient};
pub use gateway::{InferenceGateway, PipelineState, PipelineStates};
pub use pipeline::{Classification, PipelineLoader, SentimentPipeline, SummaryPipeline};
