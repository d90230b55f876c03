//! 基于关系的授权规则。
//!
//! 判定依据是请求者与资源之间的关系（是否为某演讲的演讲者、
//! 某条报名是否属于本人），而不只是静态角色。所有判定对
//! [`UserRole`] 穷尽匹配，资源是否存在由调用方在进入判定前检查。

use crate::errors::DomainError;
use crate::presenter::Presenter;
use crate::registration::Registration;
use crate::user::{User, UserRole};
use crate::value_objects::UserId;

/// 创建演讲：listener 之外的角色均可。
pub fn ensure_can_create_presentation(user: &User) -> Result<(), DomainError> {
    match user.role {
        UserRole::Presenter => Ok(()),
        UserRole::Listener => Err(DomainError::InsufficientPermissions),
    }
}

/// 创建排期与创建演讲遵循同一条角色规则。
pub fn ensure_can_create_schedule(user: &User) -> Result<(), DomainError> {
    match user.role {
        UserRole::Presenter => Ok(()),
        UserRole::Listener => Err(DomainError::InsufficientPermissions),
    }
}

/// 修改或删除演讲：必须是该演讲已关联的演讲者之一。
pub fn ensure_presenter_of(user_id: UserId, presenters: &[Presenter]) -> Result<(), DomainError> {
    if presenters.iter().any(|link| link.user_id == user_id) {
        Ok(())
    } else {
        Err(DomainError::InsufficientPermissions)
    }
}

/// 报名：只有 listener 角色可以。
pub fn ensure_can_register(user: &User) -> Result<(), DomainError> {
    match user.role {
        UserRole::Listener => Ok(()),
        UserRole::Presenter => Err(DomainError::InsufficientPermissions),
    }
}

/// 取消报名：这条报名必须属于请求者本人。
pub fn ensure_owns_registration(
    user_id: UserId,
    registration: &Registration,
) -> Result<(), DomainError> {
    if registration.user_id == user_id {
        Ok(())
    } else {
        Err(DomainError::InsufficientPermissions)
    }
}
