pub mod assignment;
pub mod candidate_selector;
pub mod intersection_resolver;
pub mod match_error;
pub mod match_orchestrator;
pub mod match_result;
pub mod matcher_params;
pub mod scored_candidate;
