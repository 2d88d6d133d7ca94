pub mod action;
pub mod batch;
pub mod content;
pub mod metrics;
pub mod simulation;
pub mod zombie_score;
