//! HTTP middleware stack.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Session layer (tower-sessions with `PostgreSQL` store)

pub mod auth;
pub mod session;

pub use auth::{
    OptionalMerchant, RequireMerchant, RequireReviewer, clear_current_merchant,
    set_current_merchant,
};
pub use session::create_session_layer;
