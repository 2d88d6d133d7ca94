pub mod analysis;
pub mod commands;
pub mod models;

pub use commands::cli::run;
