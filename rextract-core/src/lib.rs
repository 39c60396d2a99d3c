pub mod error;
pub mod extract;
pub mod image;
pub mod ocr;
pub mod store;
pub mod types;

pub use error::{EntityKind, ExtractionError, StoreError};
pub use extract::extract_text;
pub use image::{ImageKind, ImageUpload, ALLOWED_CONTENT_TYPES, MAX_FILE_SIZE};
pub use ocr::{create_engine, FakeEngine, OcrConfig, OcrEngine, OcrError, TesseractEngine};
pub use store::{MemoryStore, RecipeStore};
pub use types::{
    Ingredient, IngredientAmount, NewIngredient, NewRecipe, Recipe, RecipeDetail,
    RecipeIngredient, RecipeIngredientDetail,
};
