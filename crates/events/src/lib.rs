//! In-process platform events.
//!
//! Session changes (`auth.*`) and analysis lifecycle changes (`analysis.*`)
//! are published here; the API fans them out to subscribed clients.

pub mod bus;

pub use bus::{EventBus, PlatformEvent};

/// Event type names published on the bus.
pub mod event_types {
    pub const AUTH_SIGNED_UP: &str = "auth.signed_up";
    pub const AUTH_SIGNED_IN: &str = "auth.signed_in";
    pub const AUTH_SIGNED_OUT: &str = "auth.signed_out";
    pub const AUTH_TOKEN_REFRESHED: &str = "auth.token_refreshed";
    pub const ANALYSIS_CREATED: &str = "analysis.created";
    pub const ANALYSIS_COMPLETED: &str = "analysis.completed";
}
