//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use bodega_core::{Email, MerchantId};

/// Session-stored merchant identity.
///
/// Minimal data stored in the session to identify the logged-in merchant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentMerchant {
    /// Merchant's database ID.
    pub id: MerchantId,
    /// Merchant's email address.
    pub email: Email,
    /// Whether the account can operate the reviewer surface.
    pub is_staff: bool,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in merchant.
    pub const CURRENT_MERCHANT: &str = "current_merchant";
}
