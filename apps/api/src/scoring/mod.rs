// Multi-agent candidate scoring.
// Panel evaluation, aggregation, narrative synthesis and the pipeline that ties them together.
// All provider calls go through llm_client.

pub mod aggregator;
pub mod evaluator;
pub mod handlers;
pub mod narrative;
pub mod orchestrator;
pub mod panel;
pub mod pipeline;
pub mod prompts;
pub mod render;
pub mod types;
