use super::get::IngredientResponse;
use crate::api::{ApiError, ErrorResponse};
use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListIngredientsResponse {
    pub ingredients: Vec<IngredientResponse>,
}

#[utoipa::path(
    get,
    path = "/api/ingredients",
    tag = "ingredients",
    responses(
        (status = 200, description = "All ingredients ordered by name", body = ListIngredientsResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_ingredients(
    State(state): State<AppState>,
) -> Result<Json<ListIngredientsResponse>, ApiError> {
    let ingredients = state.store.list_ingredients()?;
    Ok(Json(ListIngredientsResponse {
        ingredients: ingredients.into_iter().map(Into::into).collect(),
    }))
}
