// Resume tailoring: prompt construction, ATS post-processing, match scoring
// and the pipeline tying them to the completion client.
// All completion calls go through llm_client.

pub mod ats_optimizer;
pub mod handlers;
pub mod match_scorer;
pub mod pipeline;
pub mod prompts;
pub mod tone;
