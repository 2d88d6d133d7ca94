pub mod action;
pub mod cannibal;
pub mod simulation;
pub mod url_path;
pub mod zombie_score;
