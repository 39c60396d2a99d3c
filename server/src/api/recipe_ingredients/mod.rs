pub mod delete;
pub mod update;

use crate::AppState;
use axum::routing::put;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipe-ingredients endpoints (mounted at /api/recipe-ingredients)
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        put(update::update_recipe_ingredient).delete(delete::detach_ingredient),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(update::update_recipe_ingredient, delete::detach_ingredient),
    components(schemas(update::UpdateRecipeIngredientRequest))
)]
pub struct ApiDoc;
