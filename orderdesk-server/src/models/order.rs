//! Order payloads

use serde::Deserialize;

use super::patch::present;

/// POST /orders body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewOrder {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub address: Option<String>,
    pub price: Option<i64>,
    pub customer_id: Option<i64>,
    pub executor_id: Option<i64>,
}

/// PUT /orders/{id} body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderPatch {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub start_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub end_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub price: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub customer_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub executor_id: Option<Option<i64>>,
}

impl OrderPatch {
    /// True when no known key was supplied.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.address.is_none()
            && self.price.is_none()
            && self.customer_id.is_none()
            && self.executor_id.is_none()
    }
}
