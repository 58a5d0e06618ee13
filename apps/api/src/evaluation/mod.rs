// ATS evaluation: prompt composition, the submission pipeline, reply interpretation.
// The only LLM call goes through llm_client::Evaluator.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod result;
