//! Table definitions, applied idempotently at startup
//!
//! Table names are singular (`user`, `"order"`, `offer`) so an existing
//! `orders.db` from earlier deployments is picked up as is.

use sqlx::SqlitePool;

const USERS: &str = r#"
CREATE TABLE IF NOT EXISTS user (
    id INTEGER PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    age INTEGER CHECK (age > 15),
    email TEXT NOT NULL,
    role TEXT NOT NULL,
    phone TEXT NOT NULL
)
"#;

const ORDERS: &str = r#"
CREATE TABLE IF NOT EXISTS "order" (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    start_date TEXT,
    end_date TEXT,
    address TEXT NOT NULL,
    price INTEGER NOT NULL,
    customer_id INTEGER REFERENCES user(id),
    executor_id INTEGER REFERENCES user(id)
)
"#;

// Offers are removed along with their executor by `UserRepo::delete`;
// deleting an order leaves its offers behind.
const OFFERS: &str = r#"
CREATE TABLE IF NOT EXISTS offer (
    id INTEGER PRIMARY KEY,
    order_id INTEGER REFERENCES "order"(id),
    executor_id INTEGER REFERENCES user(id)
)
"#;

/// Create all tables if they do not exist yet.
pub async fn bootstrap(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Applying orderdesk schema");

    let mut tx = pool.begin().await?;
    for statement in [USERS, ORDERS, OFFERS] {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;

    Ok(())
}
