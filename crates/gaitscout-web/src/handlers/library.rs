//! Reference library listing.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;

use gaitscout_common::ApiError;

use super::{Page, Pagination};
use crate::state::SharedState;

/// GET /api/library
pub async fn list_library(
    State(state): State<SharedState>,
    Query(q): Query<Pagination>,
) -> Result<impl IntoResponse, ApiError> {
    let (page, page_size) = q.resolve()?;
    let items = state.stores.library.list().await;
    Ok(Json(Page::slice(items, page, page_size)))
}
