use std::sync::Arc;

use domain::{
    authorization, overlapping_schedules, PresentationId, RepositoryError, RoomId, Schedule,
    ScheduleId, TimeSlot, Timestamp, UserId,
};
use uuid::Uuid;

use crate::{
    clock::Clock, dto::ScheduleDto, error::ApplicationError,
    repository::{PresentationRepository, RoomRepository, ScheduleRepository, UserRepository},
};

#[derive(Debug, Clone)]
pub struct CreateScheduleRequest {
    pub operator_id: Uuid,
    pub room_id: Uuid,
    pub presentation_id: Uuid,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

/// 部分更新：缺省字段沿用当前值，合并后的完整区间重新过冲突检测。
#[derive(Debug, Clone)]
pub struct UpdateScheduleRequest {
    pub operator_id: Uuid,
    pub schedule_id: Uuid,
    pub room_id: Option<Uuid>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
}

pub struct ScheduleServiceDependencies {
    pub schedule_repository: Arc<dyn ScheduleRepository>,
    pub room_repository: Arc<dyn RoomRepository>,
    pub presentation_repository: Arc<dyn PresentationRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub clock: Arc<dyn Clock>,
}

pub struct ScheduleService {
    deps: ScheduleServiceDependencies,
}

impl ScheduleService {
    pub fn new(deps: ScheduleServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn create(
        &self,
        request: CreateScheduleRequest,
    ) -> Result<ScheduleDto, ApplicationError> {
        let operator = self
            .deps
            .user_repository
            .find_by_id(UserId::from(request.operator_id))
            .await?
            .ok_or(domain::DomainError::UserNotFound)?;
        authorization::ensure_can_create_schedule(&operator)?;

        // 区间先于任何查询校验
        let slot = TimeSlot::new(request.start_time, request.end_time)?;

        let room_id = RoomId::from(request.room_id);
        self.deps
            .room_repository
            .find_by_id(room_id)
            .await?
            .ok_or(domain::DomainError::RoomNotFound)?;

        let presentation_id = PresentationId::from(request.presentation_id);
        self.deps
            .presentation_repository
            .find_by_id(presentation_id)
            .await?
            .ok_or(domain::DomainError::PresentationNotFound)?;

        if self
            .deps
            .schedule_repository
            .find_by_presentation(presentation_id)
            .await?
            .is_some()
        {
            return Err(domain::DomainError::PresentationAlreadyScheduled.into());
        }

        let booked = self.deps.schedule_repository.list_by_room(room_id).await?;
        if !overlapping_schedules(&slot, &booked, None).is_empty() {
            return Err(domain::DomainError::ScheduleConflict.into());
        }

        let schedule = Schedule::new(
            ScheduleId::from(Uuid::new_v4()),
            room_id,
            presentation_id,
            slot,
            self.deps.clock.now(),
        );

        let stored = match self.deps.schedule_repository.create(schedule).await {
            Ok(schedule) => schedule,
            // 并发写入竞争的败者由存储层约束兜底
            Err(RepositoryError::Conflict) => {
                return Err(domain::DomainError::ScheduleConflict.into())
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(schedule = %stored.id, room = %room_id, "schedule created");
        Ok(ScheduleDto::from(&stored))
    }

    pub async fn update(
        &self,
        request: UpdateScheduleRequest,
    ) -> Result<ScheduleDto, ApplicationError> {
        let schedule_id = ScheduleId::from(request.schedule_id);
        let mut schedule = self
            .deps
            .schedule_repository
            .find_by_id(schedule_id)
            .await?
            .ok_or(domain::DomainError::ScheduleNotFound)?;

        self.ensure_operator_presents(request.operator_id, schedule.presentation_id)
            .await?;

        // 未给出的字段与当前值合并，再校验完整的生效区间
        let room_id = request
            .room_id
            .map(RoomId::from)
            .unwrap_or(schedule.room_id);
        let slot = TimeSlot::new(
            request.start_time.unwrap_or_else(|| schedule.slot.start()),
            request.end_time.unwrap_or_else(|| schedule.slot.end()),
        )?;

        if room_id != schedule.room_id {
            self.deps
                .room_repository
                .find_by_id(room_id)
                .await?
                .ok_or(domain::DomainError::RoomNotFound)?;
        }

        let booked = self.deps.schedule_repository.list_by_room(room_id).await?;
        if !overlapping_schedules(&slot, &booked, Some(schedule_id)).is_empty() {
            return Err(domain::DomainError::ScheduleConflict.into());
        }

        schedule.reassign(room_id, slot, self.deps.clock.now());

        let stored = match self.deps.schedule_repository.update(schedule).await {
            Ok(schedule) => schedule,
            Err(RepositoryError::Conflict) => {
                return Err(domain::DomainError::ScheduleConflict.into())
            }
            Err(err) => return Err(err.into()),
        };

        Ok(ScheduleDto::from(&stored))
    }

    pub async fn delete(
        &self,
        operator_id: Uuid,
        schedule_id: Uuid,
    ) -> Result<(), ApplicationError> {
        let schedule_id = ScheduleId::from(schedule_id);
        let schedule = self
            .deps
            .schedule_repository
            .find_by_id(schedule_id)
            .await?
            .ok_or(domain::DomainError::ScheduleNotFound)?;

        self.ensure_operator_presents(operator_id, schedule.presentation_id)
            .await?;

        self.deps.schedule_repository.delete(schedule_id).await?;
        tracing::info!(schedule = %schedule_id, "schedule deleted");
        Ok(())
    }

    pub async fn get(&self, schedule_id: Uuid) -> Result<ScheduleDto, ApplicationError> {
        let schedule = self
            .deps
            .schedule_repository
            .find_by_id(ScheduleId::from(schedule_id))
            .await?
            .ok_or(domain::DomainError::ScheduleNotFound)?;
        Ok(ScheduleDto::from(&schedule))
    }

    pub async fn list(&self) -> Result<Vec<ScheduleDto>, ApplicationError> {
        let schedules = self.deps.schedule_repository.list().await?;
        Ok(schedules.iter().map(ScheduleDto::from).collect())
    }

    /// 排期的修改权跟随其演讲的演讲者关联。
    async fn ensure_operator_presents(
        &self,
        operator_id: Uuid,
        presentation_id: PresentationId,
    ) -> Result<(), ApplicationError> {
        let links = self
            .deps
            .presentation_repository
            .list_presenters(presentation_id)
            .await?;
        authorization::ensure_presenter_of(UserId::from(operator_id), &links)?;
        Ok(())
    }
}
