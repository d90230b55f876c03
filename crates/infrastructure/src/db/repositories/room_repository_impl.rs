//! 房间 Repository 实现

use application::RoomRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{RepositoryError, Room, RoomId};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{map_sqlx_err, DbPool};

#[derive(Debug, Clone, FromRow)]
struct DbRoom {
    id: Uuid,
    name: String,
    seat_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DbRoom> for Room {
    fn from(row: DbRoom) -> Self {
        Room {
            id: RoomId::from(row.id),
            name: row.name,
            seat_count: row.seat_count.max(0) as u32,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgRoomRepository {
    pool: DbPool,
}

impl PgRoomRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    async fn create(&self, room: Room) -> Result<Room, RepositoryError> {
        let row = sqlx::query_as::<_, DbRoom>(
            r#"INSERT INTO rooms (id, name, seat_count, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, name, seat_count, created_at, updated_at"#,
        )
        .bind(Uuid::from(room.id))
        .bind(&room.name)
        .bind(room.seat_count as i32)
        .bind(room.created_at)
        .bind(room.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(Room::from(row))
    }

    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, RepositoryError> {
        let row = sqlx::query_as::<_, DbRoom>(
            "SELECT id, name, seat_count, created_at, updated_at FROM rooms WHERE id = $1",
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(Room::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Room>, RepositoryError> {
        let row = sqlx::query_as::<_, DbRoom>(
            "SELECT id, name, seat_count, created_at, updated_at FROM rooms WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(Room::from))
    }

    async fn list(&self) -> Result<Vec<Room>, RepositoryError> {
        let rows = sqlx::query_as::<_, DbRoom>(
            "SELECT id, name, seat_count, created_at, updated_at FROM rooms ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(rows.into_iter().map(Room::from).collect())
    }
}
