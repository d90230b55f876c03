//! 报名 Repository 实现

use application::RegistrationRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Registration, RegistrationId, RepositoryError, ScheduleId, UserId};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{map_sqlx_err, DbPool};

#[derive(Debug, Clone, FromRow)]
struct DbRegistration {
    id: Uuid,
    schedule_id: Uuid,
    user_id: Uuid,
    registered_at: DateTime<Utc>,
}

impl From<DbRegistration> for Registration {
    fn from(row: DbRegistration) -> Self {
        Registration {
            id: RegistrationId::from(row.id),
            schedule_id: ScheduleId::from(row.schedule_id),
            user_id: UserId::from(row.user_id),
            registered_at: row.registered_at,
        }
    }
}

pub struct PgRegistrationRepository {
    pool: DbPool,
}

impl PgRegistrationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RegistrationRepository for PgRegistrationRepository {
    async fn create(&self, registration: Registration) -> Result<Registration, RepositoryError> {
        let row = sqlx::query_as::<_, DbRegistration>(
            r#"INSERT INTO registrations (id, schedule_id, user_id, registered_at)
               VALUES ($1, $2, $3, $4)
               RETURNING id, schedule_id, user_id, registered_at"#,
        )
        .bind(Uuid::from(registration.id))
        .bind(Uuid::from(registration.schedule_id))
        .bind(Uuid::from(registration.user_id))
        .bind(registration.registered_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(Registration::from(row))
    }

    async fn delete(&self, id: RegistrationId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: RegistrationId,
    ) -> Result<Option<Registration>, RepositoryError> {
        let row = sqlx::query_as::<_, DbRegistration>(
            "SELECT id, schedule_id, user_id, registered_at FROM registrations WHERE id = $1",
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(Registration::from))
    }

    async fn find_by_schedule_and_user(
        &self,
        schedule_id: ScheduleId,
        user_id: UserId,
    ) -> Result<Option<Registration>, RepositoryError> {
        let row = sqlx::query_as::<_, DbRegistration>(
            r#"SELECT id, schedule_id, user_id, registered_at
               FROM registrations
               WHERE schedule_id = $1 AND user_id = $2"#,
        )
        .bind(Uuid::from(schedule_id))
        .bind(Uuid::from(user_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(Registration::from))
    }

    async fn count_by_schedule(&self, schedule_id: ScheduleId) -> Result<u64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM registrations WHERE schedule_id = $1")
                .bind(Uuid::from(schedule_id))
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_err)?;

        Ok(count.max(0) as u64)
    }
}
