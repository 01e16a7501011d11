pub mod quiz_service;
pub mod scoring_service;
