//! Order endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{Map, Value};

use crate::db::repos::{Order, OrderRepo, OrderSummary};
use crate::http::error::ApiError;
use crate::http::extractors::{EntityId, OptionalJson};
use crate::http::server::AppState;
use crate::models::{NewOrder, OrderPatch, ValidationError};

/// GET /orders - list orders with customer and executor names
async fn list_orders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OrderSummary>>, ApiError> {
    let orders = OrderRepo::new(&state.pool).list().await?;
    Ok(Json(orders))
}

/// POST /orders - create an order
async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewOrder>,
) -> Result<Json<Order>, ApiError> {
    let order = OrderRepo::new(&state.pool).create(req).await?;
    Ok(Json(order))
}

/// GET /orders/{id} - get one order with customer and executor names
async fn get_order(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
) -> Result<Json<OrderSummary>, ApiError> {
    let order = OrderRepo::new(&state.pool).summary(id).await?;
    Ok(Json(order))
}

/// PUT /orders/{id} - partial update
///
/// A missing body, `null` or `{}` changes nothing and answers 204. Any other
/// object answers with the stored order, even when none of its keys are
/// order fields.
async fn update_order(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
    OptionalJson(body): OptionalJson<Map<String, Value>>,
) -> Result<Response, ApiError> {
    let repo = OrderRepo::new(&state.pool);

    match body.filter(|fields| !fields.is_empty()) {
        Some(fields) => {
            let patch: OrderPatch = serde_json::from_value(Value::Object(fields)).map_err(|e| {
                ApiError::Validation(ValidationError::MalformedBody {
                    reason: e.to_string(),
                })
            })?;
            let order = repo.update(id, patch).await?;
            Ok(Json(order).into_response())
        }
        None => {
            repo.find(id).await?;
            Ok(StatusCode::NO_CONTENT.into_response())
        }
    }
}

/// DELETE /orders/{id} - delete an order, leaving its offers
async fn delete_order(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
) -> Result<Json<String>, ApiError> {
    OrderRepo::new(&state.pool).delete(id).await?;
    Ok(Json(format!("Order with id {} has been deleted", id)))
}

/// Order routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route(
            "/orders/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
}
