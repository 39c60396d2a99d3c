//! Relational rules of the recipe store, checked against the in-memory backend.

use rextract_core::{
    EntityKind, IngredientAmount, MemoryStore, NewIngredient, NewRecipe, RecipeStore, StoreError,
};
use uuid::Uuid;

fn recipe(store: &dyn RecipeStore, name: &str) -> Uuid {
    store.create_recipe(NewRecipe::new(name).unwrap()).unwrap().id
}

fn ingredient(store: &dyn RecipeStore, name: &str) -> Uuid {
    store
        .create_ingredient(NewIngredient::new(name).unwrap())
        .unwrap()
        .id
}

fn amount(quantity: &str, unit: &str) -> IngredientAmount {
    IngredientAmount::new(quantity, unit).unwrap()
}

#[test]
fn test_attach_links_existing_entities() {
    let store = MemoryStore::new();
    let cake = recipe(&store, "Cake");
    let sugar = ingredient(&store, "sugar");

    let row = store
        .attach_ingredient(cake, sugar, amount("1/2", "cups"))
        .unwrap();

    assert_eq!(row.recipe_id, cake);
    assert_eq!(row.ingredient_id, sugar);
    assert_eq!(row.quantity, "1/2");
    assert_eq!(row.unit, "cups");
    assert_eq!(store.get_recipe_ingredient(row.id).unwrap(), row);
}

#[test]
fn test_attach_missing_recipe_is_reference_error() {
    let store = MemoryStore::new();
    let sugar = ingredient(&store, "sugar");
    let missing = Uuid::new_v4();

    let result = store.attach_ingredient(missing, sugar, amount("1", "cup"));

    assert_eq!(
        result,
        Err(StoreError::Reference {
            entity: EntityKind::Recipe,
            id: missing
        })
    );
    // nothing was created on the fly
    assert!(matches!(
        store.get_recipe(missing),
        Err(StoreError::NotFound { .. })
    ));
    assert!(store.delete_ingredient(sugar).is_ok());
}

#[test]
fn test_attach_missing_ingredient_is_reference_error() {
    let store = MemoryStore::new();
    let cake = recipe(&store, "Cake");
    let missing = Uuid::new_v4();

    let result = store.attach_ingredient(cake, missing, amount("1", "cup"));

    assert_eq!(
        result,
        Err(StoreError::Reference {
            entity: EntityKind::Ingredient,
            id: missing
        })
    );
    assert!(store.recipe_ingredients(cake).unwrap().is_empty());
    assert!(store.list_ingredients().unwrap().is_empty());
}

#[test]
fn test_same_pair_may_repeat() {
    let store = MemoryStore::new();
    let bread = recipe(&store, "Bread");
    let flour = ingredient(&store, "flour");

    let first = store
        .attach_ingredient(bread, flour, amount("200", "g"))
        .unwrap();
    let second = store
        .attach_ingredient(bread, flour, amount("1", "tbsp"))
        .unwrap();

    assert_ne!(first.id, second.id);
    let rows = store.recipe_ingredients(bread).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].quantity.as_str(), rows[0].unit.as_str()), ("200", "g"));
    assert_eq!((rows[1].quantity.as_str(), rows[1].unit.as_str()), ("1", "tbsp"));
}

#[test]
fn test_delete_recipe_cascades_only_its_rows() {
    let store = MemoryStore::new();
    let cake = recipe(&store, "Cake");
    let cookies = recipe(&store, "Cookies");
    let sugar = ingredient(&store, "sugar");
    let butter = ingredient(&store, "butter");

    store
        .attach_ingredient(cake, sugar, amount("200", "g"))
        .unwrap();
    store
        .attach_ingredient(cake, butter, amount("100", "g"))
        .unwrap();
    let kept = store
        .attach_ingredient(cookies, sugar, amount("1", "cup"))
        .unwrap();

    let removed = store.delete_recipe(cake).unwrap();

    assert_eq!(removed, 2);
    assert!(matches!(
        store.get_recipe(cake),
        Err(StoreError::NotFound { .. })
    ));
    assert!(matches!(
        store.recipe_ingredients(cake),
        Err(StoreError::NotFound { .. })
    ));
    assert_eq!(store.recipe_ingredients(cookies).unwrap(), vec![kept]);
    assert_eq!(store.list_ingredients().unwrap().len(), 2);
    assert!(store.get_ingredient(butter).is_ok());
}

#[test]
fn test_delete_missing_recipe_is_not_found() {
    let store = MemoryStore::new();
    let missing = Uuid::new_v4();
    assert_eq!(
        store.delete_recipe(missing),
        Err(StoreError::NotFound {
            entity: EntityKind::Recipe,
            id: missing
        })
    );
}

#[test]
fn test_detach_leaves_referents() {
    let store = MemoryStore::new();
    let soup = recipe(&store, "Soup");
    let salt = ingredient(&store, "salt");
    let row = store
        .attach_ingredient(soup, salt, amount("1", "pinch"))
        .unwrap();

    store.detach_ingredient(row.id).unwrap();

    assert!(store.recipe_ingredients(soup).unwrap().is_empty());
    assert!(store.get_recipe(soup).is_ok());
    assert!(store.get_ingredient(salt).is_ok());
    assert!(matches!(
        store.detach_ingredient(row.id),
        Err(StoreError::NotFound {
            entity: EntityKind::RecipeIngredient,
            ..
        })
    ));
}

#[test]
fn test_referenced_ingredient_cannot_be_deleted() {
    let store = MemoryStore::new();
    let soup = recipe(&store, "Soup");
    let salt = ingredient(&store, "salt");
    let row = store
        .attach_ingredient(soup, salt, amount("1", "tsp"))
        .unwrap();

    assert_eq!(
        store.delete_ingredient(salt),
        Err(StoreError::InUse {
            id: salt,
            references: 1
        })
    );

    store.detach_ingredient(row.id).unwrap();
    store.delete_ingredient(salt).unwrap();
    assert!(store.list_ingredients().unwrap().is_empty());
}

#[test]
fn test_update_recipe_ingredient_amount() {
    let store = MemoryStore::new();
    let tea = recipe(&store, "Tea");
    let honey = ingredient(&store, "honey");
    let row = store
        .attach_ingredient(tea, honey, amount("1", "tsp"))
        .unwrap();

    let updated = store
        .update_recipe_ingredient(row.id, amount("2", "tbsp"))
        .unwrap();

    assert_eq!(updated.id, row.id);
    assert_eq!(updated.quantity, "2");
    assert_eq!(updated.unit, "tbsp");
    assert_eq!(updated.ingredient_id, honey);
}

#[test]
fn test_recipe_detail_names_lines_in_insertion_order() {
    let store = MemoryStore::new();
    let pancakes = recipe(&store, "Pancakes");
    let milk = ingredient(&store, "milk");
    let egg = ingredient(&store, "egg");
    let flour = ingredient(&store, "flour");

    store
        .attach_ingredient(pancakes, milk, amount("300", "ml"))
        .unwrap();
    store.attach_ingredient(pancakes, egg, amount("2", "")).unwrap();
    store
        .attach_ingredient(pancakes, flour, amount("1 1/4", "cups"))
        .unwrap();

    let detail = store.recipe_detail(pancakes).unwrap();

    assert_eq!(detail.recipe.name, "Pancakes");
    let names: Vec<&str> = detail
        .ingredients
        .iter()
        .map(|line| line.ingredient_name.as_str())
        .collect();
    assert_eq!(names, vec!["milk", "egg", "flour"]);
    assert_eq!(detail.ingredients[2].quantity, "1 1/4");
}

#[test]
fn test_lists_are_sorted_by_name() {
    let store = MemoryStore::new();
    recipe(&store, "Waffles");
    recipe(&store, "Apple pie");
    ingredient(&store, "yeast");
    ingredient(&store, "butter");

    let recipes: Vec<String> = store
        .list_recipes()
        .unwrap()
        .into_iter()
        .map(|r| r.name)
        .collect();
    let ingredients: Vec<String> = store
        .list_ingredients()
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();

    assert_eq!(recipes, vec!["Apple pie", "Waffles"]);
    assert_eq!(ingredients, vec!["butter", "yeast"]);
}

#[test]
fn test_rename_missing_ingredient_is_not_found() {
    let store = MemoryStore::new();
    let missing = Uuid::new_v4();
    assert!(matches!(
        store.rename_ingredient(missing, NewIngredient::new("salt").unwrap()),
        Err(StoreError::NotFound {
            entity: EntityKind::Ingredient,
            ..
        })
    ));
}

#[test]
fn test_concurrent_attach_and_delete_stay_consistent() {
    use std::sync::Arc;
    use std::thread;

    let store = Arc::new(MemoryStore::new());
    let sugar = ingredient(store.as_ref(), "sugar");
    let recipes: Vec<Uuid> = (0..8)
        .map(|i| recipe(store.as_ref(), &format!("Recipe {}", i)))
        .collect();

    let handles: Vec<_> = recipes
        .iter()
        .copied()
        .map(|recipe_id| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..10 {
                    store
                        .attach_ingredient(recipe_id, sugar, amount("1", "g"))
                        .unwrap();
                }
                store.delete_recipe(recipe_id).unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(store.list_recipes().unwrap().is_empty());
    store.delete_ingredient(sugar).unwrap();
}
