//! Core types for Bodega.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod business_category;
pub mod email;
pub mod id;
pub mod mobile;
pub mod pricing;

pub use business_category::{BusinessCategory, BusinessCategoryError};
pub use email::{Email, EmailError};
pub use id::*;
pub use mobile::{MobileNumber, MobileNumberError};
pub use pricing::{Pricing, PricingError};
