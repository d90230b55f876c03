use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::user::{User, UserRole};
use crate::value_objects::{PresentationId, Timestamp, UserId};

/// 演讲者关联：一条 (演讲, 用户) 记录，二者联合唯一。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presenter {
    pub presentation_id: PresentationId,
    pub user_id: UserId,
    pub linked_at: Timestamp,
}

impl Presenter {
    /// 建立演讲者关联。角色只在建立关联的这一刻校验：
    /// 之后该用户被降级为 listener 并不会解除已有关联。
    pub fn link(
        presentation_id: PresentationId,
        user: &User,
        now: Timestamp,
    ) -> Result<Self, DomainError> {
        match user.role {
            UserRole::Presenter => Ok(Self {
                presentation_id,
                user_id: user.id,
                linked_at: now,
            }),
            UserRole::Listener => Err(DomainError::PresenterRoleRequired),
        }
    }
}
