use sqlx::{Pool, Postgres};

use crate::authentication::permissions::ActionType;
use crate::database::error::ApiError;
use crate::database::schema::Ingredient;
use crate::database::validate::IngredientLookup;
use crate::jwt::SessionData;

pub async fn list_ingredients(pool: &Pool<Postgres>) -> Result<Vec<Ingredient>, ApiError> {
    let rows: Vec<Ingredient> = sqlx::query_as("SELECT * FROM ingredients ORDER BY name")
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Reference lookup filtered by name prefix, for the ingredient picker.
pub async fn fetch_ingredients(
    prefix: &str,
    pool: &Pool<Postgres>,
) -> Result<Vec<Ingredient>, ApiError> {
    let rows: Vec<Ingredient> =
        sqlx::query_as("SELECT * FROM ingredients WHERE name ILIKE $1 || '%' ORDER BY name")
            .bind(prefix)
            .fetch_all(pool)
            .await?;

    Ok(rows)
}

pub async fn get_ingredient(
    id: i32,
    pool: &Pool<Postgres>,
) -> Result<Option<Ingredient>, ApiError> {
    let row: Option<Ingredient> = sqlx::query_as("SELECT * FROM ingredients WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Resolves the referenced ids into the lookup table the validation engine
/// takes. Ids that don't exist are simply absent from the result.
pub async fn get_ingredient_lookup(
    ids: &[i32],
    pool: &Pool<Postgres>,
) -> Result<IngredientLookup, ApiError> {
    let rows: Vec<Ingredient> = sqlx::query_as("SELECT * FROM ingredients WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|i| (i.id, i)).collect())
}

/// Admin seeding of reference data.
pub async fn create_ingredient(
    name: &str,
    measurement_unit: &str,
    session: &SessionData,
    pool: &Pool<Postgres>,
) -> Result<i32, ApiError> {
    session.authenticate(ActionType::ManageIngredients)?;

    let row: (i32,) = sqlx::query_as(
        "
        INSERT INTO ingredients (name, measurement_unit)
        VALUES ($1, $2)
        RETURNING id;
    ",
    )
    .bind(name)
    .bind(measurement_unit)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}
