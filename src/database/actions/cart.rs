use sqlx::{Pool, Postgres};

use crate::authentication::permissions::ActionType;
use crate::database::error::{ApiError, Conflict};
use crate::database::form::ToggleAction;
use crate::database::schema::CartIngredientRow;
use crate::database::shopping::{aggregate, render, ShoppingListItem};
use crate::jwt::SessionData;

use super::recipes::get_recipe;

/// Puts a recipe on the session user's shopping list, or takes it off.
/// Same single-statement shape as the favorite toggle; the unique pair
/// constraint decides races.
pub async fn toggle_cart_entry(
    recipe_id: i32,
    session: &SessionData,
    action: ToggleAction,
    pool: &Pool<Postgres>,
) -> Result<(), ApiError> {
    session.authenticate(ActionType::ManageOwnCart)?;

    if get_recipe(recipe_id, pool).await?.is_none() {
        return Err(ApiError::NotFound("recipe"));
    }

    match action {
        ToggleAction::Add => {
            let result = sqlx::query(
                "INSERT INTO cart_entries (user_id, recipe_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(session.user_id)
            .bind(recipe_id)
            .execute(pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(ApiError::Conflict(Conflict::AlreadyInCart));
            }
        }
        ToggleAction::Remove => {
            let result =
                sqlx::query("DELETE FROM cart_entries WHERE user_id = $1 AND recipe_id = $2")
                    .bind(session.user_id)
                    .bind(recipe_id)
                    .execute(pool)
                    .await?;

            if result.rows_affected() == 0 {
                return Err(ApiError::Conflict(Conflict::NotInCart));
            }
        }
    }

    log::debug!(
        "cart {:?} user={} recipe={}",
        action,
        session.user_id,
        recipe_id
    );

    Ok(())
}

/// Every ingredient line of every recipe in the user's cart, one query.
/// The ORDER BY pins the first-appearance order the aggregation keeps.
async fn list_cart_ingredients(
    user_id: i32,
    pool: &Pool<Postgres>,
) -> Result<Vec<CartIngredientRow>, ApiError> {
    let rows: Vec<CartIngredientRow> = sqlx::query_as(
        "
        SELECT i.name AS name, i.measurement_unit AS measurement_unit, ri.amount AS amount
        FROM cart_entries c
        INNER JOIN recipe_ingredients ri ON ri.recipe_id = c.recipe_id
        INNER JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE c.user_id = $1
        ORDER BY c.recipe_id, ri.ingredient_id
    ",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Aggregated shopping list of the session user, as structured data.
pub async fn build_shopping_list(
    session: &SessionData,
    pool: &Pool<Postgres>,
) -> Result<Vec<ShoppingListItem>, ApiError> {
    session.authenticate(ActionType::ManageOwnCart)?;

    let rows = list_cart_ingredients(session.user_id, pool).await?;

    Ok(aggregate(&rows))
}

/// Plain-text export body. The HTTP layer wraps it as an attachment via
/// `shopping_list_attachment`.
pub async fn download_shopping_cart(
    session: &SessionData,
    pool: &Pool<Postgres>,
) -> Result<String, ApiError> {
    let items = build_shopping_list(session, pool).await?;

    Ok(render(&items))
}
