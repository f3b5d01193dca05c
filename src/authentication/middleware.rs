use warp::reject::Rejection;
use warp::Filter;

use crate::constants::{SESSION_COOKIE, SHOPPING_LIST_CONTENT_TYPE, SHOPPING_LIST_FILENAME};

use super::jwt::{verify_jwt_session, SessionData};

pub fn with_auth() -> impl Filter<Extract = ((),), Error = Rejection> + Copy {
    warp::cookie::<String>(SESSION_COOKIE).and_then(|session: String| async move {
        match verify_jwt_session(&session) {
            Ok(_) => Ok(()),
            Err(e) => Err(Rejection::from(e)),
        }
    })
}

pub fn with_session() -> impl Filter<Extract = (SessionData,), Error = Rejection> + Copy {
    warp::cookie::<String>(SESSION_COOKIE).and_then(|session: String| async move {
        match verify_jwt_session(&session) {
            Ok(data) => Ok(SessionData::from(data)),
            Err(e) => Err(Rejection::from(e)),
        }
    })
}

/// Anonymous readers pass through with `None`.
pub fn with_possible_session(
) -> impl Filter<Extract = (Option<SessionData>,), Error = Rejection> + Copy {
    warp::cookie::optional::<String>(SESSION_COOKIE).and_then(|session: Option<String>| async move {
        Ok::<Option<SessionData>, Rejection>(
            session
                .and_then(|token| verify_jwt_session(&token).ok())
                .map(SessionData::from),
        )
    })
}

/// Wraps the rendered shopping list as a downloadable text attachment.
pub fn shopping_list_attachment(body: String) -> impl warp::Reply {
    let reply = warp::reply::with_header(body, "Content-Type", SHOPPING_LIST_CONTENT_TYPE);
    warp::reply::with_header(
        reply,
        "Content-Disposition",
        format!("attachment; filename={SHOPPING_LIST_FILENAME}"),
    )
}
