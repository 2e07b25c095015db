mod client;

pub use client::{GenerationError, OpenAiClient, OpenAiClientBuilder, SynthesisGenerator};
