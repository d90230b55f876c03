use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{RoomId, Timestamp};

/// 物理房间。删除房间会级联使其下全部排期失效（由存储层约束保证）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub seat_count: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Room {
    /// 座位数上限。存储层以 32 位整数落库，超出的请求在进域前拒绝。
    pub const MAX_SEAT_COUNT: u32 = 100_000;

    pub fn new(
        id: RoomId,
        name: impl Into<String>,
        seat_count: u32,
        now: Timestamp,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(DomainError::invalid_argument("name", "cannot be empty"));
        }
        if name.len() > 64 {
            return Err(DomainError::invalid_argument("name", "too long"));
        }
        if seat_count == 0 {
            return Err(DomainError::invalid_argument(
                "seat_count",
                "must be positive",
            ));
        }
        if seat_count > Self::MAX_SEAT_COUNT {
            return Err(DomainError::invalid_argument("seat_count", "too large"));
        }
        Ok(Self {
            id,
            name,
            seat_count,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn rejects_zero_capacity() {
        let result = Room::new(RoomId::new(Uuid::new_v4()), "Hall", 0, Utc::now());
        assert!(matches!(result, Err(DomainError::InvalidArgument { .. })));
    }

    #[test]
    fn rejects_capacity_above_limit() {
        let result = Room::new(
            RoomId::new(Uuid::new_v4()),
            "Stadium",
            Room::MAX_SEAT_COUNT + 1,
            Utc::now(),
        );
        assert!(matches!(result, Err(DomainError::InvalidArgument { .. })));
    }

    #[test]
    fn trims_name() {
        let room = Room::new(RoomId::new(Uuid::new_v4()), "  Hall  ", 50, Utc::now()).unwrap();
        assert_eq!(room.name, "Hall");
        assert_eq!(room.seat_count, 50);
    }
}
