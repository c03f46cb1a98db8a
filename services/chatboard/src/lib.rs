pub mod adapters;
pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod state;
