//! User endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::repos::{User, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{EntityId, OptionalJson};
use crate::http::server::AppState;
use crate::models::{NewUser, UserPatch};

/// GET /users - list all users
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    let users = UserRepo::new(&state.pool).list().await?;
    Ok(Json(users))
}

/// POST /users - create a user
async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewUser>,
) -> Result<Json<User>, ApiError> {
    let user = UserRepo::new(&state.pool).create(req).await?;
    Ok(Json(user))
}

/// GET /users/{id} - get a single user
async fn get_user(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
) -> Result<Json<User>, ApiError> {
    let user = UserRepo::new(&state.pool).get(id).await?;
    Ok(Json(user))
}

/// PUT /users/{id} - partial update
async fn update_user(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
    OptionalJson(patch): OptionalJson<UserPatch>,
) -> Result<Json<User>, ApiError> {
    let user = UserRepo::new(&state.pool)
        .update(id, patch.unwrap_or_default())
        .await?;
    Ok(Json(user))
}

/// DELETE /users/{id} - delete a user and the offers it placed
async fn delete_user(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
) -> Result<Json<String>, ApiError> {
    UserRepo::new(&state.pool).delete(id).await?;
    Ok(Json(format!("User with id {} has been deleted", id)))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
