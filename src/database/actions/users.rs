use sqlx::{Pool, Postgres};

use crate::authentication::cryptography::{hash_password, verify_password};
use crate::authentication::jwt::generate_jwt_session;
use crate::database::error::{ApiError, Conflict};
use crate::database::form::{LoginForm, RegisterForm};
use crate::database::schema::{Profile, User};

pub async fn get_user(pool: &Pool<Postgres>, username: &str) -> Result<Option<User>, ApiError> {
    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, user_id: i32) -> Result<Option<User>, ApiError> {
    let row: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Creates an account. The (username, email) uniqueness lives in the table
/// constraints; a losing insert surfaces as `UserExists`.
pub async fn register_user(form: &RegisterForm, pool: &Pool<Postgres>) -> Result<i32, ApiError> {
    let password = hash_password(&form.password)
        .map_err(|e| ApiError::Internal(format!("password hash failed: {e}")))?;

    let row: Option<(i32,)> = sqlx::query_as(
        "
        INSERT INTO users (username, email, first_name, last_name, password, role)
        VALUES ($1, $2, $3, $4, $5, 'user')
        ON CONFLICT DO NOTHING RETURNING id;
    ",
    )
    .bind(&form.username)
    .bind(&form.email)
    .bind(&form.first_name)
    .bind(&form.last_name)
    .bind(password)
    .fetch_optional(pool)
    .await?;

    match row {
        Some((id,)) => Ok(id),
        None => Err(ApiError::Conflict(Conflict::UserExists)),
    }
}

pub async fn login_user(form: &LoginForm, pool: &Pool<Postgres>) -> Result<String, ApiError> {
    let user = match get_user(pool, &form.username).await? {
        Some(user) => user,
        None => return Err(ApiError::BadRequest(String::from("Invalid credentials"))),
    };

    let authenticated = verify_password(&form.password, &user.password).unwrap_or(false);
    if !authenticated {
        return Err(ApiError::BadRequest(String::from("Invalid credentials")));
    }

    Ok(generate_jwt_session(&user))
}

/// Profile of `user_id` as seen by an optional viewer. `is_subscribed`
/// reflects whether the viewer follows this user.
pub async fn get_profile(
    user_id: i32,
    viewer_id: Option<i32>,
    pool: &Pool<Postgres>,
) -> Result<Profile, ApiError> {
    let user = get_user_by_id(pool, user_id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    let is_subscribed = match viewer_id {
        Some(viewer_id) => {
            let row: Option<(i32,)> =
                sqlx::query_as("SELECT user_id FROM follows WHERE user_id = $1 AND author_id = $2")
                    .bind(viewer_id)
                    .bind(user_id)
                    .fetch_optional(pool)
                    .await?;

            row.is_some()
        }
        None => false,
    };

    Ok(Profile::new(user, is_subscribed))
}
