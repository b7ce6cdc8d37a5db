// Screening interview engine.
// Implements: qualification registry, guardrail, answer evaluation, scoring, phase machine,
// orchestrator and the session store behind the HTTP handlers.
// All LLM calls go through llm_client, never direct HTTP calls here.

pub mod evaluator;
pub mod guardrail;
pub mod handlers;
pub mod job;
pub mod orchestrator;
pub mod phase;
pub mod prompts;
pub mod qualifications;
pub mod scoring;
pub mod session;
pub mod store;

#[cfg(test)]
pub mod testing;
