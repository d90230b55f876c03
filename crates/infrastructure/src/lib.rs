//! 基础设施层：PostgreSQL 仓储实现与 bcrypt 密码哈希。

pub mod db;
pub mod password;

pub use db::{create_pg_pool, DbPool};
pub use db::repositories::{
    PgPresentationRepository, PgRegistrationRepository, PgRoomRepository, PgScheduleRepository,
    PgUserRepository,
};
pub use password::BcryptPasswordHasher;
