//! Parsing and story assembly.

pub mod body;
pub mod choice;
pub mod config;
pub mod header;
pub mod output;
pub mod scene;
pub mod story;
