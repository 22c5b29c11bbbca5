// Recommendation engine: turns model output into bounded, ranked, trusted lists.
// Pipeline: schema → sanitizer → admission → ranking, driven by orchestrator.
// All LLM calls go through the GenerationService trait — no direct API calls here.

pub mod admission;
pub mod handlers;
pub mod orchestrator;
pub mod policy;
pub mod prompts;
pub mod ranking;
pub mod sanitizer;
pub mod schema;
pub mod skill_match;
pub mod store;
