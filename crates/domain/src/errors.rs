//! 领域模型错误定义

use thiserror::Error;

/// 领域模型错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    /// 结束时间必须晚于开始时间
    #[error("end time must be after start time")]
    InvalidInterval,

    #[error("user not found")]
    UserNotFound,

    #[error("room not found")]
    RoomNotFound,

    #[error("presentation not found")]
    PresentationNotFound,

    #[error("schedule not found")]
    ScheduleNotFound,

    #[error("registration not found")]
    RegistrationNotFound,

    #[error("email already registered")]
    EmailAlreadyRegistered,

    #[error("room name already taken")]
    RoomNameTaken,

    #[error("presentation already has a schedule")]
    PresentationAlreadyScheduled,

    /// 同一房间内时间段重叠
    #[error("schedule overlaps an existing booking in this room")]
    ScheduleConflict,

    #[error("user is already registered for this schedule")]
    AlreadyRegistered,

    #[error("room has no free seats")]
    RoomFull,

    /// 关联演讲者时对方必须持有 presenter 角色
    #[error("user does not have the presenter role")]
    PresenterRoleRequired,

    #[error("insufficient permissions")]
    InsufficientPermissions,
}

impl DomainError {
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// 领域模型结果类型
pub type DomainResult<T> = Result<T, DomainError>;

/// 存储层错误，由各 Repository 实现产生。
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    /// 唯一约束或排他约束被违反（并发竞争的败者也落在这里）
    #[error("unique or exclusion constraint violated")]
    Conflict,

    #[error("database error: {0}")]
    Database(String),
}

impl RepositoryError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }
}
