use std::sync::Arc;

use domain::{
    authorization, Registration, RegistrationId, RepositoryError, ScheduleId, UserId,
};
use uuid::Uuid;

use crate::{
    clock::Clock, dto::RegistrationDto, error::ApplicationError,
    repository::{RegistrationRepository, RoomRepository, ScheduleRepository, UserRepository},
};

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub operator_id: Uuid,
    pub schedule_id: Uuid,
}

pub struct RegistrationServiceDependencies {
    pub registration_repository: Arc<dyn RegistrationRepository>,
    pub schedule_repository: Arc<dyn ScheduleRepository>,
    pub room_repository: Arc<dyn RoomRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub clock: Arc<dyn Clock>,
    /// 满座时是否拒绝报名。历史行为不限制，默认关闭。
    pub enforce_capacity: bool,
}

pub struct RegistrationService {
    deps: RegistrationServiceDependencies,
}

impl RegistrationService {
    pub fn new(deps: RegistrationServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<RegistrationDto, ApplicationError> {
        let user = self
            .deps
            .user_repository
            .find_by_id(UserId::from(request.operator_id))
            .await?
            .ok_or(domain::DomainError::UserNotFound)?;
        authorization::ensure_can_register(&user)?;

        let schedule_id = ScheduleId::from(request.schedule_id);
        let schedule = self
            .deps
            .schedule_repository
            .find_by_id(schedule_id)
            .await?
            .ok_or(domain::DomainError::ScheduleNotFound)?;

        if self
            .deps
            .registration_repository
            .find_by_schedule_and_user(schedule_id, user.id)
            .await?
            .is_some()
        {
            return Err(domain::DomainError::AlreadyRegistered.into());
        }

        if self.deps.enforce_capacity {
            let room = self
                .deps
                .room_repository
                .find_by_id(schedule.room_id)
                .await?
                .ok_or(domain::DomainError::RoomNotFound)?;
            let taken = self
                .deps
                .registration_repository
                .count_by_schedule(schedule_id)
                .await?;
            if taken >= u64::from(room.seat_count) {
                return Err(domain::DomainError::RoomFull.into());
            }
        }

        let registration = Registration::new(
            RegistrationId::from(Uuid::new_v4()),
            schedule_id,
            user.id,
            self.deps.clock.now(),
        );

        let stored = match self.deps.registration_repository.create(registration).await {
            Ok(registration) => registration,
            // 两次相同报名并发时，唯一约束拦下第二次
            Err(RepositoryError::Conflict) => {
                return Err(domain::DomainError::AlreadyRegistered.into())
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(registration = %stored.id, schedule = %schedule_id, "listener registered");
        Ok(RegistrationDto::from(&stored))
    }

    pub async fn unregister(
        &self,
        operator_id: Uuid,
        registration_id: Uuid,
    ) -> Result<(), ApplicationError> {
        let registration_id = RegistrationId::from(registration_id);
        let registration = self
            .deps
            .registration_repository
            .find_by_id(registration_id)
            .await?
            .ok_or(domain::DomainError::RegistrationNotFound)?;

        authorization::ensure_owns_registration(UserId::from(operator_id), &registration)?;

        self.deps
            .registration_repository
            .delete(registration_id)
            .await?;
        tracing::info!(registration = %registration_id, "registration removed");
        Ok(())
    }
}
