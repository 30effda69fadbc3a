pub mod llm;
pub mod normalizer;
