//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - Any update DTOs the workflow needs

pub mod session;
pub mod user;
pub mod video_analysis;
