pub mod analysis;
pub mod analytics;
pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod mock;
pub mod render;
