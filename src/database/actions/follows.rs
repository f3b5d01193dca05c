use sqlx::{Pool, Postgres};

use crate::authentication::permissions::ActionType;
use crate::constants::FOLLOW_COUNT_PER_PAGE;
use crate::database::error::{ApiError, Conflict, Permission};
use crate::database::form::ToggleAction;
use crate::database::pagination::PageContext;
use crate::database::schema::{FollowRow, RecipeSummary};
use crate::jwt::SessionData;

use super::users::get_user_by_id;

/// Subscribes the session user to an author, or unsubscribes. The self
/// check comes first and is state-independent; the pair uniqueness is
/// decided by the table constraint.
pub async fn toggle_follow(
    author_id: i32,
    session: &SessionData,
    action: ToggleAction,
    pool: &Pool<Postgres>,
) -> Result<(), ApiError> {
    session.authenticate(ActionType::ManageOwnSubscriptions)?;

    if author_id == session.user_id {
        return Err(ApiError::Permission(Permission::SelfFollowForbidden));
    }

    if get_user_by_id(pool, author_id).await?.is_none() {
        return Err(ApiError::NotFound("user"));
    }

    match action {
        ToggleAction::Add => {
            let result = sqlx::query(
                "INSERT INTO follows (user_id, author_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(session.user_id)
            .bind(author_id)
            .execute(pool)
            .await?;

            if result.rows_affected() == 0 {
                return Err(ApiError::Conflict(Conflict::AlreadyFollowing));
            }
        }
        ToggleAction::Remove => {
            let result = sqlx::query("DELETE FROM follows WHERE user_id = $1 AND author_id = $2")
                .bind(session.user_id)
                .bind(author_id)
                .execute(pool)
                .await?;

            if result.rows_affected() == 0 {
                return Err(ApiError::Conflict(Conflict::NotFollowing));
            }
        }
    }

    log::debug!(
        "follow {:?} user={} author={}",
        action,
        session.user_id,
        author_id
    );

    Ok(())
}

/// Paginated page of authors the session user follows, with their recipe
/// counts.
pub async fn fetch_follows(
    session: &SessionData,
    offset: i64,
    pool: &Pool<Postgres>,
) -> Result<PageContext<FollowRow>, ApiError> {
    session.authenticate(ActionType::ManageOwnSubscriptions)?;

    let rows: Vec<FollowRow> = sqlx::query_as(
        "
        SELECT u.id, u.username, u.email, u.first_name, u.last_name,
            (SELECT COUNT(*) FROM recipes r WHERE r.author_id = u.id) AS recipes_count,
            COUNT(*) OVER() AS count
        FROM follows f
        INNER JOIN users u ON u.id = f.author_id
        WHERE f.user_id = $1
        ORDER BY u.username
        LIMIT $2 OFFSET $3
    ",
    )
    .bind(session.user_id)
    .bind(FOLLOW_COUNT_PER_PAGE)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total_count = rows.first().map(|r| r.count).unwrap_or(0);
    let page = PageContext::from_rows(rows, total_count, FOLLOW_COUNT_PER_PAGE, offset);

    Ok(page)
}

/// Short recipe cards shown under a followed author, newest first.
pub async fn list_author_recipes(
    author_id: i32,
    limit: Option<i64>,
    pool: &Pool<Postgres>,
) -> Result<Vec<RecipeSummary>, ApiError> {
    let rows: Vec<RecipeSummary> = sqlx::query_as(
        "
        SELECT id, name, image, cooking_time
        FROM recipes
        WHERE author_id = $1
        ORDER BY pub_date DESC
        LIMIT $2
    ",
    )
    .bind(author_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
