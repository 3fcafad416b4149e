//! PostgreSQL-backed `UserRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{StoredUser, UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, Role, User, UserId, UserName};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, unique_violation};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed credential store.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, |message| UserPersistenceError::connection(message))
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        |message| UserPersistenceError::query(message),
        |message| UserPersistenceError::connection(message),
    )
}

/// Rows are validated on the way out; a row that no longer satisfies the
/// domain rules is reported as a query failure rather than silently fixed.
fn row_to_stored_user(row: UserRow) -> Result<StoredUser, UserPersistenceError> {
    let invalid = |field: &str, err: &dyn std::fmt::Display| {
        warn!(user_id = %row.id, field, error = %err, "stored user row is invalid");
        UserPersistenceError::query(format!("stored user has invalid {field}"))
    };
    let name = UserName::new(&row.name).map_err(|err| invalid("name", &err))?;
    let email = EmailAddress::new(&row.email).map_err(|err| invalid("email", &err))?;
    let role: Role = row.role.parse().map_err(|err| invalid("role", &err))?;
    Ok(StoredUser {
        user: User {
            id: UserId::from_uuid(row.id),
            name,
            email,
            role,
            created_at: row.created_at,
        },
        password_hash: row.password_hash,
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, record: &StoredUser) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let user = &record.user;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            name: user.name.as_ref(),
            email: user.email.as_ref(),
            password_hash: record.password_hash.as_str(),
            role: user.role.as_str(),
            created_at: user.created_at,
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                if unique_violation(&err) == Some(EMAIL_CONSTRAINT) {
                    UserPersistenceError::duplicate_email(user.email.as_ref())
                } else {
                    diesel_error(err)
                }
            })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<StoredUser>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?
            .map(row_to_stored_user)
            .transpose()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(row_to_stored_user).transpose()?.map(|stored| stored.user))
    }
}
