//! Offer repository
//!
//! List and detail views join the offer's order and executor; an offer
//! whose order or executor is gone is invisible to both.

use serde::Serialize;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use super::{push_assignment, DbError};
use crate::models::{contact_line, date_frame, full_name, NewOffer, OfferPatch};

const RESOURCE: &str = "offer";

/// Offer record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Offer {
    pub id: i64,
    pub order_id: Option<i64>,
    pub executor_id: Option<i64>,
}

/// Row of the offer list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferSummary {
    pub offer_id: i64,
    pub order_id: i64,
    pub order_description: String,
    pub time_frame: Option<String>,
    pub executor_name: String,
}

/// Single offer with order title and executor contacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferDetail {
    pub id: i64,
    pub order_id: i64,
    pub order_title: String,
    pub date_frame: Option<String>,
    pub executor_full_name: String,
    pub age: Option<i64>,
    pub contact_information: String,
}

#[derive(FromRow)]
struct SummaryRow {
    offer_id: i64,
    order_id: i64,
    description: String,
    start_date: Option<String>,
    end_date: Option<String>,
    first_name: String,
    last_name: String,
}

impl From<SummaryRow> for OfferSummary {
    fn from(r: SummaryRow) -> Self {
        Self {
            offer_id: r.offer_id,
            order_id: r.order_id,
            time_frame: date_frame(r.start_date.as_deref(), r.end_date.as_deref()),
            order_description: r.description,
            executor_name: full_name(&r.first_name, &r.last_name),
        }
    }
}

#[derive(FromRow)]
struct DetailRow {
    id: i64,
    order_id: i64,
    name: String,
    start_date: Option<String>,
    end_date: Option<String>,
    first_name: String,
    last_name: String,
    age: Option<i64>,
    email: String,
    phone: String,
}

impl From<DetailRow> for OfferDetail {
    fn from(r: DetailRow) -> Self {
        Self {
            id: r.id,
            order_id: r.order_id,
            date_frame: date_frame(r.start_date.as_deref(), r.end_date.as_deref()),
            order_title: r.name,
            executor_full_name: full_name(&r.first_name, &r.last_name),
            age: r.age,
            contact_information: contact_line(&r.email, &r.phone),
        }
    }
}

/// Offer repository
pub struct OfferRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OfferRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List offers with their order and executor.
    pub async fn list(&self) -> Result<Vec<OfferSummary>, DbError> {
        let rows: Vec<SummaryRow> = sqlx::query_as(
            r#"
            SELECT
                f.id AS offer_id,
                f.order_id,
                o.description,
                o.start_date,
                o.end_date,
                u.first_name,
                u.last_name
            FROM offer f
            JOIN "order" o ON o.id = f.order_id
            JOIN user u ON u.id = f.executor_id
            ORDER BY f.id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OfferSummary::from).collect())
    }

    /// Insert an offer and return the plain row.
    pub async fn create(&self, offer: NewOffer) -> Result<Offer, DbError> {
        let offer: Offer = sqlx::query_as(
            r#"
            INSERT INTO offer (order_id, executor_id)
            VALUES (?, ?)
            RETURNING id, order_id, executor_id
            "#,
        )
        .bind(offer.order_id)
        .bind(offer.executor_id)
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(offer_id = offer.id, "offer created");
        Ok(offer)
    }

    /// Get one offer joined with its order and executor.
    pub async fn detail(&self, id: i64) -> Result<OfferDetail, DbError> {
        let row: Option<DetailRow> = sqlx::query_as(
            r#"
            SELECT
                f.id,
                f.order_id,
                o.name,
                o.start_date,
                o.end_date,
                u.first_name,
                u.last_name,
                u.age,
                u.email,
                u.phone
            FROM offer f
            JOIN "order" o ON o.id = f.order_id
            JOIN user u ON u.id = f.executor_id
            WHERE f.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(OfferDetail::from).ok_or(DbError::NotFound {
            resource: RESOURCE,
            id,
        })
    }

    /// Get the plain row for one offer.
    pub async fn find(&self, id: i64) -> Result<Offer, DbError> {
        sqlx::query_as("SELECT id, order_id, executor_id FROM offer WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(DbError::NotFound {
                resource: RESOURCE,
                id,
            })
    }

    /// Overwrite the columns present in `patch`; an empty patch is a lookup.
    pub async fn update(&self, id: i64, patch: OfferPatch) -> Result<Offer, DbError> {
        if patch.is_empty() {
            return self.find(id).await;
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE offer SET ");
        {
            let mut set = builder.separated(", ");
            push_assignment(&mut set, "order_id", patch.order_id);
            push_assignment(&mut set, "executor_id", patch.executor_id);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING id, order_id, executor_id");

        builder
            .build_query_as::<Offer>()
            .fetch_optional(self.pool)
            .await?
            .ok_or(DbError::NotFound {
                resource: RESOURCE,
                id,
            })
    }

    /// Delete an offer.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let deleted = sqlx::query("DELETE FROM offer WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(DbError::NotFound {
                resource: RESOURCE,
                id,
            });
        }

        Ok(())
    }
}
