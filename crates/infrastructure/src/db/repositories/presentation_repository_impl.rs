//! 演讲 Repository 实现
//!
//! 演讲记录与演讲者关联写在同一个事务里：
//! 任何一条写入失败，整个创建/替换一并回滚。

use application::PresentationRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Presentation, PresentationId, Presenter, RepositoryError, UserId};
use sqlx::FromRow;
use uuid::Uuid;

use crate::db::{map_sqlx_err, DbPool};

#[derive(Debug, Clone, FromRow)]
struct DbPresentation {
    id: Uuid,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DbPresentation> for Presentation {
    fn from(row: DbPresentation) -> Self {
        Presentation {
            id: PresentationId::from(row.id),
            title: row.title,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct DbPresenter {
    presentation_id: Uuid,
    user_id: Uuid,
    linked_at: DateTime<Utc>,
}

impl From<DbPresenter> for Presenter {
    fn from(row: DbPresenter) -> Self {
        Presenter {
            presentation_id: PresentationId::from(row.presentation_id),
            user_id: UserId::from(row.user_id),
            linked_at: row.linked_at,
        }
    }
}

pub struct PgPresentationRepository {
    pool: DbPool,
}

impl PgPresentationRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PresentationRepository for PgPresentationRepository {
    async fn create(
        &self,
        presentation: Presentation,
        presenters: Vec<Presenter>,
    ) -> Result<Presentation, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        let row = sqlx::query_as::<_, DbPresentation>(
            r#"INSERT INTO presentations (id, title, description, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING id, title, description, created_at, updated_at"#,
        )
        .bind(Uuid::from(presentation.id))
        .bind(&presentation.title)
        .bind(&presentation.description)
        .bind(presentation.created_at)
        .bind(presentation.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_err)?;

        for link in &presenters {
            sqlx::query(
                r#"INSERT INTO presentation_presenters (presentation_id, user_id, linked_at)
                   VALUES ($1, $2, $3)"#,
            )
            .bind(Uuid::from(link.presentation_id))
            .bind(Uuid::from(link.user_id))
            .bind(link.linked_at)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;
        }

        tx.commit().await.map_err(map_sqlx_err)?;
        Ok(Presentation::from(row))
    }

    async fn update(&self, presentation: Presentation) -> Result<Presentation, RepositoryError> {
        let row = sqlx::query_as::<_, DbPresentation>(
            r#"UPDATE presentations
               SET title = $2, description = $3, updated_at = $4
               WHERE id = $1
               RETURNING id, title, description, created_at, updated_at"#,
        )
        .bind(Uuid::from(presentation.id))
        .bind(&presentation.title)
        .bind(&presentation.description)
        .bind(presentation.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(Presentation::from(row))
    }

    async fn replace_presenters(
        &self,
        presentation_id: PresentationId,
        presenters: Vec<Presenter>,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_err)?;

        sqlx::query("DELETE FROM presentation_presenters WHERE presentation_id = $1")
            .bind(Uuid::from(presentation_id))
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

        for link in &presenters {
            sqlx::query(
                r#"INSERT INTO presentation_presenters (presentation_id, user_id, linked_at)
                   VALUES ($1, $2, $3)"#,
            )
            .bind(Uuid::from(link.presentation_id))
            .bind(Uuid::from(link.user_id))
            .bind(link.linked_at)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;
        }

        tx.commit().await.map_err(map_sqlx_err)
    }

    async fn delete(&self, id: PresentationId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM presentations WHERE id = $1")
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
        id: PresentationId,
    ) -> Result<Option<Presentation>, RepositoryError> {
        let row = sqlx::query_as::<_, DbPresentation>(
            "SELECT id, title, description, created_at, updated_at FROM presentations WHERE id = $1",
        )
        .bind(Uuid::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(row.map(Presentation::from))
    }

    async fn list(&self) -> Result<Vec<Presentation>, RepositoryError> {
        let rows = sqlx::query_as::<_, DbPresentation>(
            "SELECT id, title, description, created_at, updated_at FROM presentations ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(rows.into_iter().map(Presentation::from).collect())
    }

    async fn list_presenters(
        &self,
        presentation_id: PresentationId,
    ) -> Result<Vec<Presenter>, RepositoryError> {
        let rows = sqlx::query_as::<_, DbPresenter>(
            r#"SELECT presentation_id, user_id, linked_at
               FROM presentation_presenters
               WHERE presentation_id = $1"#,
        )
        .bind(Uuid::from(presentation_id))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_err)?;

        Ok(rows.into_iter().map(Presenter::from).collect())
    }
}
