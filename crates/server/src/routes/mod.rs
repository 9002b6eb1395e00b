//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (database)
//!
//! # Auth
//! POST /api/auth/register           - Register a merchant account
//! POST /api/auth/login              - Login (session cookie)
//! POST /api/auth/logout             - Logout
//! GET  /api/auth/me                 - Current merchant
//!
//! # Onboarding profile
//! GET  /api/profile                 - Get profile
//! POST /api/profile                 - Create/replace profile (onboards)
//! PATCH /api/profile                - Partial profile update
//! GET  /api/profile/images          - Profile/banner image URLs
//! PATCH /api/profile/images         - Upload images (multipart)
//! GET  /api/onboarding-status       - Onboarding summary
//!
//! # Inventory
//! GET    /api/products              - Own products
//! POST   /api/products              - Submit for review (202, multipart)
//! GET    /api/products/{id}         - One product
//! PATCH  /api/products/{id}         - Edit (revalidates prices)
//! DELETE /api/products/{id}         - Delete
//!
//! # Master catalog
//! GET /api/master-categories?business_category= - Categories for a business
//! GET /api/master-products/{category_id}        - Products in a category
//!
//! # Smart add
//! GET    /api/smart-add/categories            - Categories for the merchant
//! GET    /api/smart-add/products/{category_id} - Unselected products
//! POST   /api/smart-add/bulk-add              - Adopt a batch
//! DELETE /api/smart-add/products/{id}         - Remove a selection
//!
//! # Notifications
//! GET  /api/notifications              - Own notifications
//! GET  /api/notifications/unread-count - Unread count
//! POST /api/notifications/{id}/read    - Mark one read
//! POST /api/notifications/read-all     - Mark all read
//!
//! # Reviewer (requires is_staff)
//! GET   /api/admin/pending-products               - Review queue
//! GET   /api/admin/pending-products/{id}          - One submission
//! PATCH /api/admin/pending-products/{id}          - Edit category/notes
//! POST  /api/admin/pending-products/{id}/approve  - Approve
//! POST  /api/admin/pending-products/{id}/reject   - Reject
//! POST  /api/admin/pending-products/approve-batch - Batch approve
//! POST  /api/admin/pending-products/reject-batch  - Batch reject
//! ```

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod notifications;
pub mod products;
pub mod profile;
pub mod smart_add;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(profile::get_profile)
                .post(profile::save_profile)
                .patch(profile::update_profile),
        )
        .route(
            "/images",
            get(profile::get_images).patch(profile::update_images),
        )
}

/// Create the inventory routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::submit))
        .route(
            "/{id}",
            get(products::get)
                .patch(products::update)
                .delete(products::delete),
        )
}

/// Create the smart-add routes router.
pub fn smart_add_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(smart_add::categories))
        .route("/bulk-add", post(smart_add::bulk_add))
        // GET takes a master category id, DELETE a master product id
        .route(
            "/products/{id}",
            get(smart_add::available_products).delete(smart_add::remove_selection),
        )
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list))
        .route("/unread-count", get(notifications::unread_count))
        .route("/{id}/read", post(notifications::mark_read))
        .route("/read-all", post(notifications::mark_all_read))
}

/// Create the reviewer routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/pending-products", get(admin::list))
        .route("/pending-products/approve-batch", post(admin::approve_batch))
        .route("/pending-products/reject-batch", post(admin::reject_batch))
        .route(
            "/pending-products/{id}",
            get(admin::get).patch(admin::update),
        )
        .route("/pending-products/{id}/approve", post(admin::approve))
        .route("/pending-products/{id}/reject", post(admin::reject))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/profile", profile_routes())
        .route("/api/onboarding-status", get(profile::onboarding_status))
        .nest("/api/products", product_routes())
        .route("/api/master-categories", get(catalog::categories))
        .route(
            "/api/master-products/{category_id}",
            get(catalog::products_by_category),
        )
        .nest("/api/smart-add", smart_add_routes())
        .nest("/api/notifications", notification_routes())
        .nest("/api/admin", admin_routes())
}
