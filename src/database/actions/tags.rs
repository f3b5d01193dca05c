use sqlx::{Pool, Postgres};

use crate::authentication::permissions::ActionType;
use crate::database::error::{ApiError, Conflict};
use crate::database::form::TagForm;
use crate::database::schema::Tag;
use crate::database::validate::TagLookup;
use crate::jwt::SessionData;

pub async fn list_tags(pool: &Pool<Postgres>) -> Result<Vec<Tag>, ApiError> {
    let rows: Vec<Tag> = sqlx::query_as("SELECT * FROM tags ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

pub async fn get_tag(id: i32, pool: &Pool<Postgres>) -> Result<Option<Tag>, ApiError> {
    let row: Option<Tag> = sqlx::query_as("SELECT * FROM tags WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

pub async fn get_tag_lookup(ids: &[i32], pool: &Pool<Postgres>) -> Result<TagLookup, ApiError> {
    let rows: Vec<Tag> = sqlx::query_as("SELECT * FROM tags WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|t| (t.id, t)).collect())
}

/// Admin reference data. Name, slug and color are each unique; a losing
/// insert surfaces as `TagExists`.
pub async fn create_tag(
    form: &TagForm,
    session: &SessionData,
    pool: &Pool<Postgres>,
) -> Result<i32, ApiError> {
    session.authenticate(ActionType::ManageTags)?;

    let row: Option<(i32,)> = sqlx::query_as(
        "
        INSERT INTO tags (name, slug, color)
        VALUES ($1, $2, $3)
        ON CONFLICT DO NOTHING RETURNING id;
    ",
    )
    .bind(&form.name)
    .bind(&form.slug)
    .bind(&form.color)
    .fetch_optional(pool)
    .await?;

    match row {
        Some((id,)) => Ok(id),
        None => Err(ApiError::Conflict(Conflict::TagExists)),
    }
}
