use crate::api::{ApiError, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rextract_core::{IngredientAmount, RecipeIngredient};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeIngredientResponse {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: String,
    pub unit: String,
    pub created_at: DateTime<Utc>,
}

impl From<RecipeIngredient> for RecipeIngredientResponse {
    fn from(row: RecipeIngredient) -> Self {
        Self {
            id: row.id,
            recipe_id: row.recipe_id,
            ingredient_id: row.ingredient_id,
            quantity: row.quantity,
            unit: row.unit,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRecipeIngredientsResponse {
    pub ingredients: Vec<RecipeIngredientResponse>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AttachIngredientRequest {
    pub ingredient_id: Uuid,
    /// Free text, e.g. "1/2" or "a pinch"
    pub quantity: String,
    /// May be empty for countable ingredients ("2 eggs")
    #[serde(default)]
    pub unit: String,
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/ingredients",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Ingredient lines in insertion order", body = ListRecipeIngredientsResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn list_recipe_ingredients(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ListRecipeIngredientsResponse>, ApiError> {
    let rows = state.store.recipe_ingredients(id)?;
    Ok(Json(ListRecipeIngredientsResponse {
        ingredients: rows.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/recipes/{id}/ingredients",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    request_body = AttachIngredientRequest,
    responses(
        (status = 201, description = "Ingredient attached", body = RecipeIngredientResponse),
        (status = 400, description = "Invalid quantity or unit", body = ErrorResponse),
        (status = 422, description = "Recipe or ingredient does not exist", body = ErrorResponse)
    )
)]
pub async fn attach_ingredient(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AttachIngredientRequest>,
) -> Result<(StatusCode, Json<RecipeIngredientResponse>), ApiError> {
    let amount = IngredientAmount::new(&request.quantity, &request.unit)?;
    let row = state
        .store
        .attach_ingredient(id, request.ingredient_id, amount)?;
    Ok((StatusCode::CREATED, Json(row.into())))
}
