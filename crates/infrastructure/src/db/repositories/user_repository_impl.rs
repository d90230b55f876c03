//! 用户 Repository 实现

use application::UserRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{PasswordHash, RepositoryError, User, UserEmail, UserId};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{map_sqlx_err, DbPool};

use super::{parse_role, role_to_str};

/// 数据库用户模型
#[derive(Debug, Clone, FromRow)]
struct DbUser {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    role: String,
    refresh_token: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DbUser> for User {
    type Error = RepositoryError;

    fn try_from(row: DbUser) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId::from(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: UserEmail::parse(row.email)
                .map_err(|err| RepositoryError::database(err.to_string()))?,
            password: PasswordHash::new(row.password_hash)
                .map_err(|err| RepositoryError::database(err.to_string()))?,
            role: parse_role(&row.role)?,
            refresh_token: row.refresh_token,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct PgUserRepository {
    pool: DbPool,
}

impl PgUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, DbUser>(
            r#"INSERT INTO users
                   (id, first_name, last_name, email, password_hash, role, refresh_token,
                    created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
               RETURNING id, first_name, last_name, email, password_hash, role, refresh_token,
                         created_at, updated_at"#,
        )
        .bind(Uuid::from(user.id))
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.email.as_str())
        .bind(user.password.as_str())
        .bind(role_to_str(user.role))
        .bind(&user.refresh_token)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        User::try_from(row)
    }

    async fn update(&self, user: User) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, DbUser>(
            r#"UPDATE users
               SET first_name = $2, last_name = $3, email = $4, password_hash = $5,
                   role = $6, refresh_token = $7, updated_at = $8
               WHERE id = $1
               RETURNING id, first_name, last_name, email, password_hash, role, refresh_token,
                         created_at, updated_at"#,
        )
        .bind(Uuid::from(user.id))
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.email.as_str())
        .bind(user.password.as_str())
        .bind(role_to_str(user.role))
        .bind(&user.refresh_token)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        User::try_from(row)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, DbUser>(
            r#"SELECT id, first_name, last_name, email, password_hash, role, refresh_token,
                      created_at, updated_at
               FROM users
               WHERE id = $1"#,
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &UserEmail) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, DbUser>(
            r#"SELECT id, first_name, last_name, email, password_hash, role, refresh_token,
                      created_at, updated_at
               FROM users
               WHERE email = $1"#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        row.map(User::try_from).transpose()
    }
}
