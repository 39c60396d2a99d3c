use crate::api::{ApiError, ErrorResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use rextract_core::{Recipe, RecipeDetail, RecipeIngredientDetail};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeResponse {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

/// One ingredient line of a recipe, with the ingredient's name resolved.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientLine {
    /// Recipe-ingredient ID
    pub id: Uuid,
    pub ingredient_id: Uuid,
    pub name: String,
    pub quantity: String,
    pub unit: String,
}

impl From<RecipeIngredientDetail> for IngredientLine {
    fn from(line: RecipeIngredientDetail) -> Self {
        Self {
            id: line.id,
            ingredient_id: line.ingredient_id,
            name: line.ingredient_name,
            quantity: line.quantity,
            unit: line.unit,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecipeDetailResponse {
    pub id: Uuid,
    pub name: String,
    pub ingredients: Vec<IngredientLine>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RecipeDetail> for RecipeDetailResponse {
    fn from(detail: RecipeDetail) -> Self {
        Self {
            id: detail.recipe.id,
            name: detail.recipe.name,
            ingredients: detail.ingredients.into_iter().map(Into::into).collect(),
            created_at: detail.recipe.created_at,
            updated_at: detail.recipe.updated_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "recipes",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 200, description = "Recipe with its ingredient lines", body = RecipeDetailResponse),
        (status = 404, description = "Recipe not found", body = ErrorResponse)
    )
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeDetailResponse>, ApiError> {
    let detail = state.store.recipe_detail(id)?;
    Ok(Json(detail.into()))
}
