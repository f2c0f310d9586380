//! Offer payloads

use serde::Deserialize;

use super::patch::present;

/// POST /offers body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewOffer {
    pub order_id: Option<i64>,
    pub executor_id: Option<i64>,
}

/// PUT /offers/{id} body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferPatch {
    #[serde(default, deserialize_with = "present")]
    pub order_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub executor_id: Option<Option<i64>>,
}

impl OfferPatch {
    /// True when no known key was supplied.
    pub fn is_empty(&self) -> bool {
        self.order_id.is_none() && self.executor_id.is_none()
    }
}
