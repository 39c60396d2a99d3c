pub mod create;
pub mod delete;
pub mod extract;
pub mod get;
pub mod ingredients;
pub mod list;
pub mod update;

use crate::AppState;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list::list_recipes).post(create::create_recipe))
        .route(
            "/extract-recipe-from-image",
            post(extract::extract_recipe_from_image),
        )
        .route(
            "/{id}",
            get(get::get_recipe)
                .put(update::update_recipe)
                .delete(delete::delete_recipe),
        )
        .route(
            "/{id}/ingredients",
            get(ingredients::list_recipe_ingredients).post(ingredients::attach_ingredient),
        )
}

/// Extraction under its original path, merged at the root.
pub fn legacy_router() -> Router<AppState> {
    Router::new().route(
        "/recipes/extract-recipe-from-image",
        post(extract::extract_recipe_from_image_legacy),
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        extract::extract_recipe_from_image,
        extract::extract_recipe_from_image_legacy,
        create::create_recipe,
        list::list_recipes,
        get::get_recipe,
        update::update_recipe,
        delete::delete_recipe,
        ingredients::list_recipe_ingredients,
        ingredients::attach_ingredient,
    ),
    components(schemas(
        extract::ExtractTextRequest,
        extract::ExtractTextResponse,
        create::CreateRecipeRequest,
        list::ListRecipesResponse,
        get::RecipeResponse,
        get::RecipeDetailResponse,
        get::IngredientLine,
        update::UpdateRecipeRequest,
        ingredients::RecipeIngredientResponse,
        ingredients::ListRecipeIngredientsResponse,
        ingredients::AttachIngredientRequest,
    ))
)]
pub struct ApiDoc;
