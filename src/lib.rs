pub mod analysis;
pub mod config;
pub mod data_models;
pub mod error;
pub mod export;
pub mod flatten;
pub mod matcher;
pub mod platforms;
pub mod provider;
pub mod ranker;
pub mod report;
