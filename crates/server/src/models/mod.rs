//! Domain models for the merchant and reviewer APIs.
//!
//! Row types derive `sqlx::FromRow` and double as the domain types; the
//! route modules define their own response payloads on top of these.

pub mod catalog;
pub mod merchant;
pub mod notification;
pub mod product;
pub mod session;

pub use catalog::{MasterCategory, MasterProduct, SmartAddSelection};
pub use merchant::{Merchant, MerchantProfile};
pub use notification::Notification;
pub use product::{PendingProduct, PendingReview, Product};
pub use session::CurrentMerchant;
