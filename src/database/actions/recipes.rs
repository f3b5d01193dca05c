use sqlx::{Pool, Postgres, QueryBuilder};

use crate::authentication::permissions::ActionType;
use crate::constants::RECIPE_COUNT_PER_PAGE;
use crate::database::error::{ApiError, Permission};
use crate::database::form::{ImageData, RecipeFilters, RecipeSubmission};
use crate::database::pagination::PageContext;
use crate::database::schema::{IngredientLine, Recipe, RecipeRow, Tag};
use crate::database::validate::{validate_recipe_submission, ValidatedRecipe};
use crate::jwt::SessionData;
use crate::media::MediaStore;

use super::{ingredients, tags};

pub async fn get_recipe(id: i32, pool: &Pool<Postgres>) -> Result<Option<Recipe>, ApiError> {
    let row: Option<Recipe> = sqlx::query_as("SELECT * FROM recipes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Fetches a recipe for mutation. Admins pass; everybody else must be the
/// author.
pub async fn get_recipe_mut(
    id: i32,
    session: &SessionData,
    pool: &Pool<Postgres>,
) -> Result<Recipe, ApiError> {
    let recipe = get_recipe(id, pool).await?;
    session.authenticate(ActionType::ManageOwnRecipes)?;

    match recipe {
        Some(recipe) => match session.authenticate(ActionType::ManageAllRecipes) {
            Ok(_) => Ok(recipe),
            Err(_) => {
                if recipe.author_id != session.user_id {
                    Err(ApiError::Permission(Permission::NotOwner))
                } else {
                    Ok(recipe)
                }
            }
        },
        None => Err(ApiError::NotFound("recipe")),
    }
}

/// Recipe listing, newest first. Filters compose independently; the
/// favorited/in-cart filters and flags only apply when a viewer is present.
pub async fn fetch_recipes(
    filters: &RecipeFilters,
    viewer_id: Option<i32>,
    offset: i64,
    pool: &Pool<Postgres>,
) -> Result<PageContext<RecipeRow>, ApiError> {
    let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
        "SELECT r.id, r.author_id, r.name, r.image, r.text, r.cooking_time, r.pub_date, ",
    );

    match viewer_id {
        Some(viewer_id) => {
            query.push("EXISTS(SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = ");
            query.push_bind(viewer_id);
            query.push(") AS is_favorited, ");
            query.push(
                "EXISTS(SELECT 1 FROM cart_entries c WHERE c.recipe_id = r.id AND c.user_id = ",
            );
            query.push_bind(viewer_id);
            query.push(") AS is_in_shopping_cart, ");
        }
        None => {
            query.push("FALSE AS is_favorited, FALSE AS is_in_shopping_cart, ");
        }
    }

    query.push("COUNT(*) OVER() AS count FROM recipes r WHERE TRUE");

    if let Some(author) = filters.author {
        query.push(" AND r.author_id = ");
        query.push_bind(author);
    }

    if !filters.tags.is_empty() {
        query.push(
            " AND r.id IN (SELECT rt.recipe_id FROM recipe_tags rt \
             INNER JOIN tags t ON t.id = rt.tag_id WHERE t.slug = ANY(",
        );
        query.push_bind(filters.tags.clone());
        query.push("))");
    }

    if let Some(viewer_id) = viewer_id {
        if filters.is_favorited {
            query.push(" AND EXISTS(SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = ");
            query.push_bind(viewer_id);
            query.push(")");
        }
        if filters.is_in_shopping_cart {
            query.push(" AND EXISTS(SELECT 1 FROM cart_entries c WHERE c.recipe_id = r.id AND c.user_id = ");
            query.push_bind(viewer_id);
            query.push(")");
        }
    }

    query.push(" ORDER BY r.pub_date DESC LIMIT ");
    query.push_bind(RECIPE_COUNT_PER_PAGE);
    query.push(" OFFSET ");
    query.push_bind(offset);

    let rows: Vec<RecipeRow> = query.build_query_as().fetch_all(pool).await?;

    let total_count = rows.first().map(|r| r.count).unwrap_or(0);
    let page = PageContext::from_rows(rows, total_count, RECIPE_COUNT_PER_PAGE, offset);

    Ok(page)
}

pub async fn list_recipe_ingredients(
    recipe_id: i32,
    pool: &Pool<Postgres>,
) -> Result<Vec<IngredientLine>, ApiError> {
    let rows: Vec<IngredientLine> = sqlx::query_as(
        "
        SELECT i.id AS id, i.name AS name, i.measurement_unit AS measurement_unit, ri.amount AS amount
        FROM recipe_ingredients ri
        INNER JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE ri.recipe_id = $1
        ORDER BY ri.ingredient_id
    ",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

pub async fn list_recipe_tags(recipe_id: i32, pool: &Pool<Postgres>) -> Result<Vec<Tag>, ApiError> {
    let rows: Vec<Tag> = sqlx::query_as(
        "
        SELECT t.*
        FROM recipe_tags rt
        INNER JOIN tags t ON t.id = rt.tag_id
        WHERE rt.recipe_id = $1
        ORDER BY rt.tag_id
    ",
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Resolves reference sets and runs the validation engine over the
/// submission.
async fn validate_submission(
    submission: &RecipeSubmission,
    pool: &Pool<Postgres>,
) -> Result<ValidatedRecipe, ApiError> {
    let ingredient_ids: Vec<i32> = submission.ingredients.iter().map(|l| l.id).collect();
    let known_ingredients = ingredients::get_ingredient_lookup(&ingredient_ids, pool).await?;
    let known_tags = tags::get_tag_lookup(&submission.tags, pool).await?;

    let validated = validate_recipe_submission(submission, &known_ingredients, &known_tags)?;

    Ok(validated)
}

async fn insert_associations(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    recipe_id: i32,
    validated: &ValidatedRecipe,
) -> Result<(), ApiError> {
    let mut tag_query: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO recipe_tags (recipe_id, tag_id) ");
    tag_query.push_values(validated.tags.iter(), |mut b, tag| {
        b.push_bind(recipe_id).push_bind(tag.id);
    });
    tag_query.build().execute(&mut **tx).await?;

    let mut line_query: QueryBuilder<Postgres> =
        QueryBuilder::new("INSERT INTO recipe_ingredients (recipe_id, ingredient_id, amount) ");
    line_query.push_values(validated.ingredients.iter(), |mut b, (ingredient, amount)| {
        b.push_bind(recipe_id)
            .push_bind(ingredient.id)
            .push_bind(*amount);
    });
    line_query.build().execute(&mut **tx).await?;

    Ok(())
}

/// Validates and persists a new recipe with its tag links and ingredient
/// lines as one transaction.
pub async fn create_recipe(
    submission: &RecipeSubmission,
    session: &SessionData,
    store: &MediaStore,
    pool: &Pool<Postgres>,
) -> Result<i32, ApiError> {
    session.authenticate(ActionType::CreateRecipes)?;

    let validated = validate_submission(submission, pool).await?;

    let payload = match submission.image.as_deref() {
        Some(payload) => ImageData::try_from(payload)?,
        None => return Err(ApiError::BadRequest(String::from("Image payload is required"))),
    };
    let image = store.store_recipe_image(&payload)?;

    let mut tx = pool.begin().await?;

    let recipe: (i32,) = sqlx::query_as(
        "
        INSERT INTO recipes (author_id, name, image, text, cooking_time, pub_date)
        VALUES ($1, $2, $3, $4, $5, NOW())
        RETURNING id
    ",
    )
    .bind(session.user_id)
    .bind(&validated.name)
    .bind(&image)
    .bind(&validated.text)
    .bind(validated.cooking_time)
    .fetch_one(&mut *tx)
    .await?;

    insert_associations(&mut tx, recipe.0, &validated).await?;

    tx.commit().await?;

    log::debug!("recipe created id={} author={}", recipe.0, session.user_id);

    Ok(recipe.0)
}

/// Re-validates the full replacement set and swaps scalar fields, tag links
/// and ingredient lines in one transaction. The previous associations are
/// deleted wholesale before the new set goes in, so no partial mix is ever
/// visible.
pub async fn update_recipe(
    recipe_id: i32,
    submission: &RecipeSubmission,
    session: &SessionData,
    store: &MediaStore,
    pool: &Pool<Postgres>,
) -> Result<(), ApiError> {
    let recipe = get_recipe_mut(recipe_id, session, pool).await?;

    let validated = validate_submission(submission, pool).await?;

    let image = match submission.image.as_deref() {
        Some(payload) => store.store_recipe_image(&ImageData::try_from(payload)?)?,
        None => recipe.image,
    };

    let mut tx = pool.begin().await?;

    sqlx::query(
        "UPDATE recipes SET name = $1, image = $2, text = $3, cooking_time = $4 WHERE id = $5",
    )
    .bind(&validated.name)
    .bind(&image)
    .bind(&validated.text)
    .bind(validated.cooking_time)
    .bind(recipe_id)
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = $1")
        .bind(recipe_id)
        .execute(&mut *tx)
        .await?;

    insert_associations(&mut tx, recipe_id, &validated).await?;

    tx.commit().await?;

    log::debug!("recipe updated id={recipe_id}");

    Ok(())
}

/// Author-only delete; favorites, cart entries and ingredient lines go with
/// the cascade.
pub async fn delete_recipe(
    recipe_id: i32,
    session: &SessionData,
    pool: &Pool<Postgres>,
) -> Result<(), ApiError> {
    let recipe = get_recipe_mut(recipe_id, session, pool).await?;

    sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(recipe.id)
        .execute(pool)
        .await?;

    log::debug!("recipe deleted id={}", recipe.id);

    Ok(())
}
