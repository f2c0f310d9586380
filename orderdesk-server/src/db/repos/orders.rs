//! Order repository
//!
//! Reads come in two shapes: the plain row (create/update responses) and
//! the summary joined with customer and executor. Orders whose customer or
//! executor row is missing drop out of the summary (inner joins).

use serde::Serialize;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use super::{push_assignment, DbError};
use crate::models::{date_frame, full_name, NewOrder, OrderPatch};

const RESOURCE: &str = "order";

const SUMMARY_SELECT: &str = r#"
    SELECT
        o.id,
        o.description,
        o.start_date,
        o.end_date,
        o.address,
        o.price,
        c.first_name AS customer_first_name,
        c.last_name AS customer_last_name,
        e.first_name AS executor_first_name,
        e.last_name AS executor_last_name
    FROM "order" o
    JOIN user c ON c.id = o.customer_id
    JOIN user e ON e.id = o.executor_id
"#;

/// Order record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub address: String,
    pub price: i64,
    pub customer_id: Option<i64>,
    pub executor_id: Option<i64>,
}

/// Order joined with the names of its customer and executor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub id: i64,
    pub order_description: String,
    pub date_frame: Option<String>,
    pub address: String,
    pub price: i64,
    pub customer_full_name: String,
    pub executor_full_name: String,
}

#[derive(FromRow)]
struct SummaryRow {
    id: i64,
    description: String,
    start_date: Option<String>,
    end_date: Option<String>,
    address: String,
    price: i64,
    customer_first_name: String,
    customer_last_name: String,
    executor_first_name: String,
    executor_last_name: String,
}

impl From<SummaryRow> for OrderSummary {
    fn from(r: SummaryRow) -> Self {
        Self {
            id: r.id,
            date_frame: date_frame(r.start_date.as_deref(), r.end_date.as_deref()),
            order_description: r.description,
            address: r.address,
            price: r.price,
            customer_full_name: full_name(&r.customer_first_name, &r.customer_last_name),
            executor_full_name: full_name(&r.executor_first_name, &r.executor_last_name),
        }
    }
}

/// Order repository
pub struct OrderRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> OrderRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List order summaries.
    ///
    /// Single query with both user joins (no N+1).
    pub async fn list(&self) -> Result<Vec<OrderSummary>, DbError> {
        let sql = format!("{} ORDER BY o.id", SUMMARY_SELECT);
        let rows: Vec<SummaryRow> = sqlx::query_as(&sql).fetch_all(self.pool).await?;

        Ok(rows.into_iter().map(OrderSummary::from).collect())
    }

    /// Insert an order and return the plain row.
    pub async fn create(&self, order: NewOrder) -> Result<Order, DbError> {
        let order: Order = sqlx::query_as(
            r#"
            INSERT INTO "order"
                (name, description, start_date, end_date, address, price, customer_id, executor_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, description, start_date, end_date, address, price,
                      customer_id, executor_id
            "#,
        )
        .bind(order.name)
        .bind(order.description)
        .bind(order.start_date)
        .bind(order.end_date)
        .bind(order.address)
        .bind(order.price)
        .bind(order.customer_id)
        .bind(order.executor_id)
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(order_id = order.id, "order created");
        Ok(order)
    }

    /// Get the joined summary for one order.
    ///
    /// Not found when the order is missing or either user reference dangles.
    pub async fn summary(&self, id: i64) -> Result<OrderSummary, DbError> {
        let sql = format!("{} WHERE o.id = ?", SUMMARY_SELECT);
        let row: Option<SummaryRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(OrderSummary::from).ok_or(DbError::NotFound {
            resource: RESOURCE,
            id,
        })
    }

    /// Get the plain row for one order.
    pub async fn find(&self, id: i64) -> Result<Order, DbError> {
        sqlx::query_as(
            r#"
            SELECT id, name, description, start_date, end_date, address, price,
                   customer_id, executor_id
            FROM "order"
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(DbError::NotFound {
            resource: RESOURCE,
            id,
        })
    }

    /// Overwrite the columns present in `patch`; an empty patch is a lookup.
    pub async fn update(&self, id: i64, patch: OrderPatch) -> Result<Order, DbError> {
        if patch.is_empty() {
            return self.find(id).await;
        }

        let mut builder = QueryBuilder::<Sqlite>::new(r#"UPDATE "order" SET "#);
        {
            let mut set = builder.separated(", ");
            push_assignment(&mut set, "name", patch.name);
            push_assignment(&mut set, "description", patch.description);
            push_assignment(&mut set, "start_date", patch.start_date);
            push_assignment(&mut set, "end_date", patch.end_date);
            push_assignment(&mut set, "address", patch.address);
            push_assignment(&mut set, "price", patch.price);
            push_assignment(&mut set, "customer_id", patch.customer_id);
            push_assignment(&mut set, "executor_id", patch.executor_id);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(
            " RETURNING id, name, description, start_date, end_date, address, price, customer_id, executor_id",
        );

        builder
            .build_query_as::<Order>()
            .fetch_optional(self.pool)
            .await?
            .ok_or(DbError::NotFound {
                resource: RESOURCE,
                id,
            })
    }

    /// Delete an order. Offers pointing at it are left in place.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let deleted = sqlx::query(r#"DELETE FROM "order" WHERE id = ?"#)
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

        tracing::debug!(order_id = id, "order deleted");
        Ok(())
    }
}
