//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{
    create_link_handler, delete_link_handler, get_link_handler, list_links_handler,
    update_link_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch},
};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /links`          - Create a short link
/// - `GET    /links`          - List links (paginated)
/// - `GET    /links/{code}`   - Fetch a link with its click count
/// - `PATCH  /links/{code}`   - Partially update a link
/// - `DELETE /links/{code}`   - Delete a link and its click history
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/links", get(list_links_handler).post(create_link_handler))
        .route(
            "/links/{code}",
            patch(update_link_handler)
                .get(get_link_handler)
                .delete(delete_link_handler),
        )
}
