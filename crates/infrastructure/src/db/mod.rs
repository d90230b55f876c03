pub mod repositories;

use domain::RepositoryError;
use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

pub async fn create_pg_pool(url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}

/// 把数据库错误折叠成仓储错误。
/// 23505（唯一约束）与 23P01（排他约束）都视为写入冲突：
/// 并发「检查-写入」竞争的败者最终落在这里。
pub(crate) fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") | Some("23P01") => RepositoryError::Conflict,
            _ => RepositoryError::database(err.to_string()),
        },
        _ => RepositoryError::database(err.to_string()),
    }
}
