//! 日程 Repository 实现
//!
//! 并发的时间冲突由数据库约束兜底：
//! 排除约束和唯一索引违反统一映射为 `RepositoryError::Conflict`。

use application::ScheduleRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{
    PresentationId, RepositoryError, RoomId, Schedule, ScheduleId, TimeSlot,
};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{map_sqlx_err, DbPool};

#[derive(Debug, Clone, FromRow)]
struct DbSchedule {
    id: Uuid,
    room_id: Uuid,
    presentation_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DbSchedule> for Schedule {
    type Error = RepositoryError;

    fn try_from(row: DbSchedule) -> Result<Self, Self::Error> {
        let slot = TimeSlot::new(row.start_time, row.end_time)
            .map_err(|e| RepositoryError::database(e.to_string()))?;
        Ok(Schedule {
            id: ScheduleId::from(row.id),
            room_id: RoomId::from(row.room_id),
            presentation_id: PresentationId::from(row.presentation_id),
            slot,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SCHEDULE_COLUMNS: &str =
    "id, room_id, presentation_id, start_time, end_time, created_at, updated_at";

pub struct PgScheduleRepository {
    pool: DbPool,
}

impl PgScheduleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScheduleRepository for PgScheduleRepository {
    async fn create(&self, schedule: Schedule) -> Result<Schedule, RepositoryError> {
        let row = sqlx::query_as::<_, DbSchedule>(
            r#"INSERT INTO schedules (id, room_id, presentation_id, start_time, end_time, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING id, room_id, presentation_id, start_time, end_time, created_at, updated_at"#,
        )
        .bind(Uuid::from(schedule.id))
        .bind(Uuid::from(schedule.room_id))
        .bind(Uuid::from(schedule.presentation_id))
        .bind(schedule.slot.start())
        .bind(schedule.slot.end())
        .bind(schedule.created_at)
        .bind(schedule.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Schedule::try_from(row)
    }

    async fn update(&self, schedule: Schedule) -> Result<Schedule, RepositoryError> {
        let row = sqlx::query_as::<_, DbSchedule>(
            r#"UPDATE schedules
               SET room_id = $2, start_time = $3, end_time = $4, updated_at = $5
               WHERE id = $1
               RETURNING id, room_id, presentation_id, start_time, end_time, created_at, updated_at"#,
        )
        .bind(Uuid::from(schedule.id))
        .bind(Uuid::from(schedule.room_id))
        .bind(schedule.slot.start())
        .bind(schedule.slot.end())
        .bind(schedule.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Schedule::try_from(row)
    }

    async fn delete(&self, id: ScheduleId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM schedules WHERE id = $1")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: ScheduleId) -> Result<Option<Schedule>, RepositoryError> {
        let row = sqlx::query_as::<_, DbSchedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = $1"
        ))
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        row.map(Schedule::try_from).transpose()
    }

    async fn find_by_presentation(
        &self,
        presentation_id: PresentationId,
    ) -> Result<Option<Schedule>, RepositoryError> {
        let row = sqlx::query_as::<_, DbSchedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE presentation_id = $1"
        ))
        .bind(Uuid::from(presentation_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        row.map(Schedule::try_from).transpose()
    }

    async fn list_by_room(&self, room_id: RoomId) -> Result<Vec<Schedule>, RepositoryError> {
        let rows = sqlx::query_as::<_, DbSchedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE room_id = $1 ORDER BY start_time"
        ))
        .bind(Uuid::from(room_id))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        rows.into_iter().map(Schedule::try_from).collect()
    }

    async fn list(&self) -> Result<Vec<Schedule>, RepositoryError> {
        let rows = sqlx::query_as::<_, DbSchedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules ORDER BY start_time"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        rows.into_iter().map(Schedule::try_from).collect()
    }
}
