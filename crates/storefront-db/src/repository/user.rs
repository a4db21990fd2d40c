//! # User Repository
//!
//! The credential store: user records plus password hashing.
//!
//! ## Password Storage
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  register("Secret1")                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  hash_password() ── argon2id + random salt ──►                         │
//! │       "$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>"  (users table)     │
//! │                                                                         │
//! │  login("Secret1")                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  verify_password(plain, stored) ── parses PHC string, recomputes ──►   │
//! │       true / false                                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Hashes never leave this module attached to a [`User`]; callers that need
//! to check a password get a [`UserCredentials`] instead.

use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use storefront_core::{Role, User};

// =============================================================================
// Password Hashing
// =============================================================================

/// Hashes a password with argon2 and a fresh random salt.
pub fn hash_password(plain: &str) -> DbResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| DbError::Hashing(e.to_string()))?;

    Ok(hash.to_string())
}

/// Checks a password against a stored PHC hash string.
///
/// A stored value that doesn't parse as a hash verifies as `false`.
pub fn verify_password(plain: &str, stored_hash: &str) -> bool {
    let parsed = match PasswordHash::new(stored_hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    name: String,
    password_hash: String,
    role: Role,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            email: self.email,
            name: self.name,
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// A user together with their stored password hash.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

impl UserCredentials {
    /// Verifies `plain` against the stored hash.
    pub fn verify(&self, plain: &str) -> bool {
        verify_password(plain, &self.password_hash)
    }
}

/// Fields for inserting a user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub role: Role,
}

const USER_COLUMNS: &str = "id, email, name, password_hash, role, created_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a user.
    ///
    /// ## Returns
    /// * `Ok(User)` - The stored user
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn create(&self, new_user: NewUser) -> DbResult<User> {
        debug!(email = %new_user.email, role = %new_user.role, "Creating user");

        let now = Utc::now();

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "INSERT INTO users (email, name, password_hash, role, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(&new_user.password_hash)
        .bind(new_user.role)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { .. } => DbError::duplicate("email", &new_user.email),
            other => other,
        })?;

        info!(user_id = row.id, email = %row.email, "User created");
        Ok(row.into_user())
    }

    /// Gets a user by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    /// Gets a user by email (case-insensitive).
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        Ok(self
            .get_credentials(email)
            .await?
            .map(|credentials| credentials.user))
    }

    /// Gets a user and their password hash by email, for login.
    pub async fn get_credentials(&self, email: &str) -> DbResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?1"
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| {
            let password_hash = row.password_hash.clone();
            UserCredentials {
                user: row.into_user(),
                password_hash,
            }
        }))
    }

    /// Counts registered users.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_user(email: &str, role: Role) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: String::new(),
            password_hash: hash_password("Secret1").unwrap(),
            role,
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("Secret1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("Secret1", &hash));
        assert!(!verify_password("secret1", &hash));

        // Salted: same password, different hash.
        assert_ne!(hash, hash_password("Secret1").unwrap());
    }

    #[test]
    fn test_unparsable_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-hash"));
        assert!(!verify_password("", ""));
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let db = setup().await;
        let users = db.users();

        let created = users.create(new_user("ann@example.com", Role::User)).await.unwrap();
        assert_eq!(created.role, Role::User);

        let by_id = users.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "ann@example.com");

        let creds = users.get_credentials("ann@example.com").await.unwrap().unwrap();
        assert!(creds.verify("Secret1"));
        assert!(!creds.verify("wrong"));

        assert!(users.get_by_id(999).await.unwrap().is_none());
        assert!(users.get_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = setup().await;
        let users = db.users();

        users.create(new_user("ann@example.com", Role::User)).await.unwrap();
        let err = users
            .create(new_user("ANN@example.com", Role::Admin))
            .await
            .unwrap_err();

        assert!(err.is_unique_violation());
        assert_eq!(users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_role_persisted() {
        let db = setup().await;
        let admin = db
            .users()
            .create(new_user("root@example.com", Role::Admin))
            .await
            .unwrap();

        let stored: String = sqlx::query_scalar("SELECT role FROM users WHERE id = ?1")
            .bind(admin.id)
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(stored, "admin");
    }
}
