//! Scene Weaver: turns a directory of Markdown scene files into story data.
//!
//! Each scene file carries a small metadata header, prose split into text
//! blocks, and an optional `### Choices` section written in a compact
//! choice-line syntax. The parser is permissive: lines it does not
//! understand are skipped rather than rejected.

pub mod core;
pub mod schema;
