//! Handlers for the link management API.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use validator::Validate;

use crate::api::dto::{
    ApiResponse, CreateLinkRequest, LinkData, LinkListData, ListLinksQuery, MessageResponse,
    Pagination, UpdateLinkRequest,
};
use crate::application::services::AuthContext;
use crate::domain::entities::LinkPatch;
use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// Body: `url` (required), `custom_code?`, `expiration_days?`.
/// Returns `201` with the created link, including its full short URL.
/// The calling token is recorded as the link's owner.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(
            payload.url,
            payload.custom_code,
            payload.expiration_days,
            Some(ctx.token_id),
        )
        .await?;

    let short_url = state.link_service.short_url(&link.code);
    let body = ApiResponse::new(LinkData::from_link(&link, short_url));

    Ok((StatusCode::CREATED, Json(body)))
}

/// Returns one link by code.
///
/// # Endpoint
///
/// `GET /api/links/{code}`
pub async fn get_link_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_service.get_link(&code).await?;
    let short_url = state.link_service.short_url(&link.code);

    Ok(Json(ApiResponse::new(LinkData::from_link(&link, short_url))))
}

/// Lists links with pagination, newest first.
///
/// # Endpoint
///
/// `GET /api/links?page=1&per_page=20&mine=true`
///
/// `mine=true` restricts the list to links created by the calling token.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(ctx): Extension<AuthContext>,
    Query(query): Query<ListLinksQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page.unwrap_or(1).max(1);
    let per_page = query
        .per_page
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let created_by = match query.mine {
        Some(true) => Some(ctx.token_id),
        _ => None,
    };

    let (links, total) = state
        .link_service
        .list_links(page, per_page, created_by)
        .await?;

    let links = links
        .iter()
        .map(|link| LinkData::from_link(link, state.link_service.short_url(&link.code)))
        .collect();

    Ok(Json(ApiResponse::new(LinkListData {
        links,
        pagination: Pagination {
            page,
            per_page,
            total,
        },
    })))
}

/// Partially updates a link.
///
/// # Endpoint
///
/// `PATCH /api/links/{code}`
///
/// Body fields: `url?`, `is_active?`, `expiration_days?`. At least one must
/// be present.
pub async fn update_link_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(payload): Json<UpdateLinkRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let patch = LinkPatch {
        url: payload.url,
        is_active: payload.is_active,
        expires_at: payload
            .expiration_days
            .map(|days| Some(Utc::now() + Duration::days(days))),
    };

    let link = state.link_service.update_link(&code, patch).await?;
    let short_url = state.link_service.short_url(&link.code);

    Ok(Json(ApiResponse::new(LinkData::from_link(&link, short_url))))
}

/// Deletes a link and its click history.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}`
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.link_service.delete_link(&code).await?;

    Ok(Json(MessageResponse::new("Shortlink deleted successfully")))
}
