pub mod analyses;
pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod events;
