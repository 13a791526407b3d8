//! Shared helpers for integration tests
//!
//! Tests run against the in-memory SurrealDB engine and the same
//! repositories and services the server uses.

#![allow(dead_code)]

use std::sync::Arc;

use surrealdb::engine::local::{Db, Mem};
use surrealdb::{RecordId, Surreal};

use mandi_server::auth::{JwtConfig, JwtService};
use mandi_server::core::{Config, ServerState};
use mandi_server::db::models::{Role, User, UserCreate};
use mandi_server::db::repository::UserRepository;

pub async fn mem_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("mandi").use_db("marketplace").await.unwrap();
    db
}

pub async fn seed_user(db: &Surreal<Db>, username: &str, role: Role) -> User {
    let repo = UserRepository::new(db.clone());
    repo.create(UserCreate {
        username: username.to_string(),
        password: "password1".to_string(),
        role,
    })
    .await
    .unwrap()
}

pub async fn seed_user_id(db: &Surreal<Db>, username: &str, role: Role) -> RecordId {
    seed_user(db, username, role).await.id.unwrap()
}

fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-0123456789abcdef".to_string(),
        expiration_minutes: 60,
        issuer: "mandi-server".to_string(),
        audience: "mandi-clients".to_string(),
    }
}

pub fn test_state(db: Surreal<Db>) -> ServerState {
    let jwt = test_jwt_config();
    let config = Config {
        work_dir: std::env::temp_dir()
            .join("mandi-test")
            .to_string_lossy()
            .into_owned(),
        http_port: 0,
        jwt: jwt.clone(),
        environment: "test".to_string(),
    };
    ServerState::new(config, db, Arc::new(JwtService::with_config(jwt)))
}
