//! # User Repository
//!
//! Operator accounts. Sales reference their operator with
//! `ON DELETE SET NULL`, so removing a user never removes sale history.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use tally_core::{Role, User};

const USER_COLUMNS: &str = "id, name, role, created_at";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user with the given role.
    pub async fn insert(&self, name: &str, role: Role) -> DbResult<User> {
        debug!(name = %name, ?role, "Inserting user");

        let user = User {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            role,
            created_at: Utc::now(),
        };

        sqlx::query("INSERT INTO users (id, name, role, created_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(&user.id)
            .bind(&user.name)
            .bind(user.role)
            .bind(user.created_at)
            .execute(&self.pool)
            .await?;

        Ok(user)
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Lists all users, newest first.
    pub async fn list(&self) -> DbResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Deletes a user. Their sales survive with `user_id` set to NULL.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting user");

        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("User", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{checkout_request, seed_product, test_db};

    #[tokio::test]
    async fn insert_and_fetch() {
        let db = test_db().await;
        let user = db.users().insert("Aisha", Role::Admin).await.unwrap();

        let stored = db.users().get_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Aisha");
        assert_eq!(stored.role, Role::Admin);
        assert!(stored.role.is_admin());
    }

    #[tokio::test]
    async fn delete_missing_user_fails() {
        let db = test_db().await;
        let err = db.users().delete("nobody").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn deleting_user_keeps_their_sales() {
        let db = test_db().await;
        let user = db.users().insert("Bilal", Role::Staff).await.unwrap();
        let product = seed_product(&db, "UX-1", 10, 2).await;

        let receipt = db
            .sales()
            .checkout(&user.id, &checkout_request(vec![(&product, 1)]))
            .await
            .unwrap();

        db.users().delete(&user.id).await.unwrap();

        let sale = db.sales().get_by_id(&receipt.sale_id).await.unwrap().unwrap();
        assert_eq!(sale.user_id, None);
    }
}
