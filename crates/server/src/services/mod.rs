//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Merchant registration and login (Argon2 password hashing)
//! - `approval` - The pending-product approval state machine
//! - `assets` - Image copy/migration between blob storage locations
//! - `notifier` - One-way merchant notifications
//! - `smart_add` - Bulk adoption of master products into merchant inventory

pub mod approval;
pub mod assets;
pub mod auth;
pub mod notifier;
pub mod smart_add;

pub use approval::{ApprovalError, ApprovalOutcome, ApprovalService, ApprovalWarning};
pub use auth::{AuthError, AuthService};
pub use smart_add::{SmartAddError, SmartAddOutcome, SmartAddService};
