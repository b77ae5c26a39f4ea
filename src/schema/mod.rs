//! Data types produced by the scene parser.

pub mod property;
pub mod scene;
