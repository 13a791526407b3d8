//! User Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Role, User, UserCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const USER_TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let rid = parse_record_id(USER_TABLE, id)?;
        let user: Option<User> = self.base.db().select(rid).await?;
        Ok(user)
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let username_owned = username.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    ///
    /// The password is hashed here; `hash_pass` never leaves the repository
    /// in serialized form, so the insert binds fields explicitly.
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        // Check duplicate username
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                data.username
            )));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    username = $username,
                    hash_pass = $hash_pass,
                    role = $role,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("username", data.username))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            .bind(("created_at", chrono::Utc::now()))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Count users holding the given role
    pub async fn count_by_role(&self, role: Role) -> RepoResult<i64> {
        #[derive(serde::Deserialize)]
        struct Counted {
            count: i64,
        }

        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM user WHERE role = $role GROUP ALL")
            .bind(("role", role))
            .await?;
        let counted: Vec<Counted> = result.take(0)?;
        Ok(counted.first().map(|c| c.count).unwrap_or(0))
    }
}
