pub mod batch;
pub mod cli;
pub mod scoring;
pub mod settings;
