use sqlx::{Pool, Postgres};

use crate::authentication::permissions::ActionType;
use crate::database::error::{ApiError, Conflict};
use crate::database::form::ToggleAction;
use crate::jwt::SessionData;

use super::recipes::get_recipe;

/// Bookmarks a recipe for the session user, or removes the bookmark.
/// The (user, recipe) unique constraint is the source of truth: a duplicate
/// add that loses a race still comes back as `AlreadyFavorited`.
pub async fn toggle_favorite(
    recipe_id: i32,
    session: &SessionData,
    action: ToggleAction,
    pool: &Pool<Postgres>,
) -> Result<(), ApiError> {
    session.authenticate(ActionType::ManageOwnFavorites)?;

    if get_recipe(recipe_id, pool).await?.is_none() {
        return Err(ApiError::NotFound("recipe"));
    }

    match action {
        ToggleAction::Add => {
            let result = sqlx::query(
                "INSERT INTO favorites (user_id, recipe_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(session.user_id)
            .bind(recipe_id)
            .execute(pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(ApiError::Conflict(Conflict::AlreadyFavorited));
            }
        }
        ToggleAction::Remove => {
            let result =
                sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND recipe_id = $2")
                    .bind(session.user_id)
                    .bind(recipe_id)
                    .execute(pool)
                    .await?;

            if result.rows_affected() == 0 {
                return Err(ApiError::Conflict(Conflict::NotFavorited));
            }
        }
    }

    log::debug!(
        "favorite {:?} user={} recipe={}",
        action,
        session.user_id,
        recipe_id
    );

    Ok(())
}
