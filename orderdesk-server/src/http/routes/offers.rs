//! Offer endpoints

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::repos::{Offer, OfferDetail, OfferRepo, OfferSummary};
use crate::http::error::ApiError;
use crate::http::extractors::{EntityId, OptionalJson};
use crate::http::server::AppState;
use crate::models::{NewOffer, OfferPatch};

/// GET /offers - list offers with order and executor
async fn list_offers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OfferSummary>>, ApiError> {
    let offers = OfferRepo::new(&state.pool).list().await?;
    Ok(Json(offers))
}

/// POST /offers - create an offer
async fn create_offer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<NewOffer>,
) -> Result<Json<Offer>, ApiError> {
    let offer = OfferRepo::new(&state.pool).create(req).await?;
    Ok(Json(offer))
}

/// GET /offers/{id} - get one offer with order title and executor contacts
async fn get_offer(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
) -> Result<Json<OfferDetail>, ApiError> {
    let offer = OfferRepo::new(&state.pool).detail(id).await?;
    Ok(Json(offer))
}

/// PUT /offers/{id} - partial update, answered with plain text
async fn update_offer(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
    OptionalJson(patch): OptionalJson<OfferPatch>,
) -> Result<String, ApiError> {
    OfferRepo::new(&state.pool)
        .update(id, patch.unwrap_or_default())
        .await?;
    Ok(format!("Offer with id {} has been updated", id))
}

/// DELETE /offers/{id} - delete an offer
async fn delete_offer(
    State(state): State<Arc<AppState>>,
    EntityId(id): EntityId,
) -> Result<Json<String>, ApiError> {
    OfferRepo::new(&state.pool).delete(id).await?;
    Ok(Json(format!("Offer with id {} has been deleted", id)))
}

/// Offer routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/offers", get(list_offers).post(create_offer))
        .route(
            "/offers/{id}",
            get(get_offer).put(update_offer).delete(delete_offer),
        )
}
