use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Why an image could not be turned into text.
///
/// Display strings are the user-facing messages returned by the HTTP layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("No image uploaded")]
    MissingImage,

    #[error("Invalid uploaded file")]
    InvalidPayload(String),

    #[error("Invalid file type. Only images are allowed.")]
    UnsupportedType(String),

    #[error("No text could be extracted from the image")]
    NoTextFound,

    #[error("OCR failed: {0}")]
    EngineFailure(String),
}

impl ExtractionError {
    /// True when the caller caused the failure and re-uploading may help.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, ExtractionError::EngineFailure(_))
    }
}

/// The three entity kinds held by a recipe store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Recipe,
    Ingredient,
    RecipeIngredient,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Recipe => "recipe",
            EntityKind::Ingredient => "ingredient",
            EntityKind::RecipeIngredient => "recipe ingredient",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A mutation pointed at an entity that does not exist. Never auto-corrected.
    #[error("Referenced {entity} {id} does not exist")]
    Reference { entity: EntityKind, id: Uuid },

    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: Uuid },

    #[error("Ingredient {id} is still used by {references} recipe ingredient(s)")]
    InUse { id: Uuid, references: usize },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}
