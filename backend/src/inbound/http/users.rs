//! Users API handlers.
//!
//! ```text
//! GET    /users/
//! GET    /users/{userId}
//! POST   /users/            {"name":"Ada","email":"ada@x.com"}
//! PUT    /users/{userId}    {"email":"ada2@x.com"}
//! DELETE /users/{userId}
//! ```
//!
//! Collection routes answer with and without the trailing slash.

use actix_web::{delete, get, put, routes, web};

use crate::domain::ports::{CreateUserRequest, UpdateEmailRequest};
use crate::domain::{Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_user_id;

/// List every stored user.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use users_api::inbound::http::users::list_users;
///
/// let app = App::new().service(list_users);
/// ```
#[utoipa::path(
    get,
    path = "/users/",
    responses(
        (status = 200, description = "All users", body = [User]),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[routes]
#[get("/users/")]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<User>>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(users))
}

/// Fetch one user; an unknown id yields `null`.
#[utoipa::path(
    get,
    path = "/users/{userId}",
    params(("userId" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 200, description = "The user, or null when absent", body = Option<User>),
        (status = 400, description = "Malformed id", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Option<User>>> {
    let id = parse_user_id(&path.into_inner())?;
    let user = state.users.find_user(&id).await?;
    Ok(web::Json(user))
}

/// Validate and store a new user.
#[utoipa::path(
    post,
    path = "/users/",
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "The created user", body = User),
        (status = 400, description = "Validation failure or duplicate email", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[routes]
#[post("/users/")]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<web::Json<User>> {
    let user = state.commands.create_user(payload.into_inner()).await?;
    Ok(web::Json(user))
}

/// Replace a user's email. Any other body fields are ignored.
#[utoipa::path(
    put,
    path = "/users/{userId}",
    params(("userId" = String, Path, description = "User identifier (UUID)")),
    request_body = UpdateEmailRequest,
    responses(
        (status = 200, description = "The updated user", body = User),
        (status = 400, description = "Malformed id or invalid email", body = Error),
        (status = 404, description = "No user with this id", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateEmailRequest>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(&path.into_inner())?;
    let user = state
        .commands
        .update_email(&id, payload.into_inner())
        .await?;
    Ok(web::Json(user))
}

/// Delete a user; repeating the call yields `null`.
#[utoipa::path(
    delete,
    path = "/users/{userId}",
    params(("userId" = String, Path, description = "User identifier (UUID)")),
    responses(
        (status = 200, description = "The deleted user, or null when absent", body = Option<User>),
        (status = 400, description = "Malformed id", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{user_id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Option<User>>> {
    let id = parse_user_id(&path.into_inner())?;
    let user = state.commands.delete_user(&id).await?;
    Ok(web::Json(user))
}
