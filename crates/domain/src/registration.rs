use serde::{Deserialize, Serialize};

use crate::value_objects::{RegistrationId, ScheduleId, Timestamp, UserId};

/// 听众对某条排期的报名，(schedule, user) 联合唯一。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub schedule_id: ScheduleId,
    pub user_id: UserId,
    pub registered_at: Timestamp,
}

impl Registration {
    pub fn new(
        id: RegistrationId,
        schedule_id: ScheduleId,
        user_id: UserId,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            schedule_id,
            user_id,
            registered_at: now,
        }
    }
}
