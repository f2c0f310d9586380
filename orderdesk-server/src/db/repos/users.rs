//! User repository
//!
//! Plain single-table CRUD. Deleting a user also removes the offers it
//! placed as executor, inside one transaction.

use serde::Serialize;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use super::{push_assignment, DbError};
use crate::models::{NewUser, UserPatch};

const RESOURCE: &str = "user";

/// User record from database
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<i64>,
    pub email: String,
    pub role: String,
    pub phone: String,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List every user, oldest first.
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, age, email, role, phone
            FROM user
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Insert a user. Missing required fields fail on the NOT NULL constraints.
    pub async fn create(&self, user: NewUser) -> Result<User, DbError> {
        let user: User = sqlx::query_as(
            r#"
            INSERT INTO user (first_name, last_name, age, email, role, phone)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id, first_name, last_name, age, email, role, phone
            "#,
        )
        .bind(user.first_name)
        .bind(user.last_name)
        .bind(user.age)
        .bind(user.email)
        .bind(user.role)
        .bind(user.phone)
        .fetch_one(self.pool)
        .await?;

        tracing::debug!(user_id = user.id, "user created");
        Ok(user)
    }

    /// Get a single user by id.
    pub async fn get(&self, id: i64) -> Result<User, DbError> {
        sqlx::query_as(
            r#"
            SELECT id, first_name, last_name, age, email, role, phone
            FROM user
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
    pub async fn update(&self, id: i64, patch: UserPatch) -> Result<User, DbError> {
        if patch.is_empty() {
            return self.get(id).await;
        }

        let mut builder = QueryBuilder::<Sqlite>::new("UPDATE user SET ");
        {
            let mut set = builder.separated(", ");
            push_assignment(&mut set, "first_name", patch.first_name);
            push_assignment(&mut set, "last_name", patch.last_name);
            push_assignment(&mut set, "age", patch.age);
            push_assignment(&mut set, "email", patch.email);
            push_assignment(&mut set, "role", patch.role);
            push_assignment(&mut set, "phone", patch.phone);
        }
        builder.push(" WHERE id = ").push_bind(id);
        builder.push(" RETURNING id, first_name, last_name, age, email, role, phone");

        builder
            .build_query_as::<User>()
            .fetch_optional(self.pool)
            .await?
            .ok_or(DbError::NotFound {
                resource: RESOURCE,
                id,
            })
    }

    /// Delete a user together with every offer it placed as executor.
    ///
    /// Nothing is removed when the user does not exist.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let offers = sqlx::query("DELETE FROM offer WHERE executor_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM user WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            tx.rollback().await?;
            return Err(DbError::NotFound {
                resource: RESOURCE,
                id,
            });
        }

        tx.commit().await?;
        tracing::debug!(user_id = id, offers_removed = offers, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    fn sample() -> NewUser {
        NewUser {
            first_name: Some("A".into()),
            last_name: Some("B".into()),
            age: Some(20),
            email: Some("a@b.com".into()),
            role: Some("client".into()),
            phone: Some("123".into()),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let pool = create_memory_pool().await.unwrap();
        let repo = UserRepo::new(&pool);

        let created = repo.create(sample()).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(repo.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn create_without_age_stores_null() {
        let pool = create_memory_pool().await.unwrap();
        let user = UserRepo::new(&pool)
            .create(NewUser {
                age: None,
                ..sample()
            })
            .await
            .unwrap();

        assert_eq!(user.age, None);
    }

    #[tokio::test]
    async fn create_missing_required_field_fails() {
        let pool = create_memory_pool().await.unwrap();
        let result = UserRepo::new(&pool)
            .create(NewUser {
                email: None,
                ..sample()
            })
            .await;

        assert!(matches!(result, Err(DbError::Sqlx(_))));
    }

    #[tokio::test]
    async fn update_changes_only_patched_columns() {
        let pool = create_memory_pool().await.unwrap();
        let repo = UserRepo::new(&pool);
        let created = repo.create(sample()).await.unwrap();

        let patch = UserPatch {
            phone: Some(Some("999".into())),
            ..Default::default()
        };
        let updated = repo.update(created.id, patch).await.unwrap();

        assert_eq!(updated.phone, "999");
        assert_eq!(updated.first_name, created.first_name);
        assert_eq!(updated.age, created.age);
    }

    #[tokio::test]
    async fn update_missing_user_is_not_found() {
        let pool = create_memory_pool().await.unwrap();
        let patch = UserPatch {
            age: Some(Some(40)),
            ..Default::default()
        };

        let result = UserRepo::new(&pool).update(999, patch).await;
        assert!(matches!(result, Err(DbError::NotFound { id: 999, .. })));
    }

    #[tokio::test]
    async fn update_age_below_limit_fails() {
        let pool = create_memory_pool().await.unwrap();
        let repo = UserRepo::new(&pool);
        let created = repo.create(sample()).await.unwrap();

        let patch = UserPatch {
            age: Some(Some(10)),
            ..Default::default()
        };
        assert!(matches!(
            repo.update(created.id, patch).await,
            Err(DbError::Sqlx(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_executor_offers_only() {
        let pool = create_memory_pool().await.unwrap();
        let repo = UserRepo::new(&pool);
        let doomed = repo.create(sample()).await.unwrap();
        let other = repo.create(sample()).await.unwrap();

        sqlx::query("INSERT INTO offer (order_id, executor_id) VALUES (1, ?), (1, ?)")
            .bind(doomed.id)
            .bind(other.id)
            .execute(&pool)
            .await
            .unwrap();

        repo.delete(doomed.id).await.unwrap();

        let (left,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM offer WHERE executor_id = ?")
            .bind(doomed.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        let (kept,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM offer")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(left, 0);
        assert_eq!(kept, 1);
    }

    #[tokio::test]
    async fn delete_missing_user_keeps_dangling_offers() {
        let pool = create_memory_pool().await.unwrap();

        sqlx::query("INSERT INTO offer (order_id, executor_id) VALUES (1, 42)")
            .execute(&pool)
            .await
            .unwrap();

        let result = UserRepo::new(&pool).delete(42).await;
        assert!(matches!(result, Err(DbError::NotFound { id: 42, .. })));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM offer")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
