/// Category endpoints
///
/// # Endpoints
///
/// - `GET  /api/categories` - List categories
/// - `POST /api/categories` - Create a category (authenticated)

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Json};
use prepstack_shared::models::category::Category;
use serde::Deserialize;
use validator::Validate;

/// Category creation request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// List categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(Category::list(&state.db).await?))
}

/// Create a category
pub async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    req.validate()?;

    let category = Category::create(&state.db, &req.name).await?;

    Ok((StatusCode::CREATED, Json(category)))
}
