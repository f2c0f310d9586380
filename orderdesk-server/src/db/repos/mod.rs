//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the pool; one short-lived repo per request
//! - Joined views are explicit, named queries (no lazy relationship loading)
//! - Derived strings are computed from joined columns after the fetch
//! - Partial updates touch only the columns present in the patch

pub mod offers;
pub mod orders;
pub mod users;

use sqlx::query_builder::Separated;
use sqlx::{Encode, Sqlite, Type};

pub use offers::{Offer, OfferDetail, OfferRepo, OfferSummary};
pub use orders::{Order, OrderRepo, OrderSummary};
pub use users::{User, UserRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("there is no {resource} with id {id}")]
    NotFound { resource: &'static str, id: i64 },
}

/// Append `column = ?` to an UPDATE's SET list when the patch carries the key.
pub(crate) fn push_assignment<'args, T>(
    set: &mut Separated<'_, 'args, Sqlite, &'static str>,
    column: &'static str,
    value: Option<Option<T>>,
) where
    T: 'args + Encode<'args, Sqlite> + Type<Sqlite> + Send,
{
    if let Some(value) = value {
        set.push(format_args!("{} = ", column));
        set.push_bind_unseparated(value);
    }
}
