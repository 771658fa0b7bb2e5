pub mod analyzer;
pub mod openai;
