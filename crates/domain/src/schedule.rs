//! 排期与时间段冲突检测。
//!
//! 一条排期占用某房间的半开区间 `[start, end)`，
//! 同一房间内任意两条排期不得重叠。

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{PresentationId, RoomId, ScheduleId, Timestamp};

/// 半开时间段 `[start, end)`。构造即校验 `end > start`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    start: Timestamp,
    end: Timestamp,
}

impl TimeSlot {
    pub fn new(start: Timestamp, end: Timestamp) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::InvalidInterval);
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Timestamp {
        self.start
    }

    pub fn end(&self) -> Timestamp {
        self.end
    }

    /// 半开区间重叠判定：`self.start < other.end && self.end > other.start`。
    /// 首尾相接的两段不算重叠。
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && self.end > other.start
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub room_id: RoomId,
    pub presentation_id: PresentationId,
    pub slot: TimeSlot,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Schedule {
    pub fn new(
        id: ScheduleId,
        room_id: RoomId,
        presentation_id: PresentationId,
        slot: TimeSlot,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            room_id,
            presentation_id,
            slot,
            created_at: now,
            updated_at: now,
        }
    }

    /// 更新合并后的目标房间与时间段，调用前必须先通过冲突检测。
    pub fn reassign(&mut self, room_id: RoomId, slot: TimeSlot, now: Timestamp) {
        self.room_id = room_id;
        self.slot = slot;
        self.updated_at = now;
    }
}

/// 冲突检测：返回 `existing` 中与 `candidate` 重叠的每一条排期，
/// 更新场景下通过 `exclude` 跳过正在修改的那条记录。
/// 调用方负责只传入同一房间的排期（按房间扫描，而非全局）。
pub fn overlapping_schedules<'a>(
    candidate: &TimeSlot,
    existing: &'a [Schedule],
    exclude: Option<ScheduleId>,
) -> Vec<&'a Schedule> {
    existing
        .iter()
        .filter(|schedule| Some(schedule.id) != exclude)
        .filter(|schedule| schedule.slot.overlaps(candidate))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    fn at(hour: u32, minute: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2025, 6, 1, hour, minute, 0).unwrap()
    }

    fn slot(start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> TimeSlot {
        TimeSlot::new(at(start_h, start_m), at(end_h, end_m)).unwrap()
    }

    fn schedule_in(room_id: RoomId, slot: TimeSlot) -> Schedule {
        Schedule::new(
            ScheduleId::new(Uuid::new_v4()),
            room_id,
            PresentationId::new(Uuid::new_v4()),
            slot,
            Utc::now(),
        )
    }

    #[test]
    fn interval_must_be_forward() {
        assert_eq!(
            TimeSlot::new(at(11, 0), at(10, 0)),
            Err(DomainError::InvalidInterval)
        );
        assert_eq!(
            TimeSlot::new(at(10, 0), at(10, 0)),
            Err(DomainError::InvalidInterval)
        );
    }

    #[test]
    fn partial_overlap_is_detected() {
        assert!(slot(10, 0, 11, 0).overlaps(&slot(10, 30, 11, 30)));
        assert!(slot(10, 30, 11, 30).overlaps(&slot(10, 0, 11, 0)));
    }

    #[test]
    fn containment_is_overlap() {
        assert!(slot(10, 0, 12, 0).overlaps(&slot(10, 30, 11, 0)));
        assert!(slot(10, 30, 11, 0).overlaps(&slot(10, 0, 12, 0)));
    }

    #[test]
    fn adjacent_slots_do_not_overlap() {
        assert!(!slot(10, 0, 11, 0).overlaps(&slot(11, 0, 12, 0)));
        assert!(!slot(11, 0, 12, 0).overlaps(&slot(10, 0, 11, 0)));
    }

    #[test]
    fn finds_every_conflicting_schedule() {
        let room_id = RoomId::new(Uuid::new_v4());
        let existing = vec![
            schedule_in(room_id, slot(9, 0, 10, 0)),
            schedule_in(room_id, slot(10, 0, 11, 0)),
            schedule_in(room_id, slot(11, 0, 12, 0)),
        ];

        let conflicts = overlapping_schedules(&slot(9, 30, 11, 30), &existing, None);
        assert_eq!(conflicts.len(), 3);

        let conflicts = overlapping_schedules(&slot(12, 0, 13, 0), &existing, None);
        assert!(conflicts.is_empty());
    }

    #[test]
    fn exclusion_skips_the_schedule_under_update() {
        let room_id = RoomId::new(Uuid::new_v4());
        let existing = vec![
            schedule_in(room_id, slot(10, 0, 11, 0)),
            schedule_in(room_id, slot(11, 0, 12, 0)),
        ];

        // 只把自己的时间段拉长一点，不与别人冲突
        let conflicts =
            overlapping_schedules(&slot(10, 0, 10, 45), &existing, Some(existing[0].id));
        assert!(conflicts.is_empty());

        // 但伸进邻居的区间仍然要被捕获
        let conflicts =
            overlapping_schedules(&slot(10, 0, 11, 30), &existing, Some(existing[0].id));
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].id, existing[1].id);
    }
}
