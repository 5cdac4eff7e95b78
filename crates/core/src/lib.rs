//! Domain logic for the Deep Guard analysis service.
//!
//! This crate has no I/O: it holds the record enums, upload validation,
//! the verdict simulator, dashboard aggregation, and the chat transcript.
//! Storage, persistence, and HTTP live in the sibling crates.

pub mod analysis;
pub mod chat;
pub mod error;
pub mod simulation;
pub mod types;
pub mod upload;
