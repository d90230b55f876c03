//! 报名管理测试：角色限制、唯一性、归属校验、可选容量限制

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use domain::{DomainError, Timestamp, UserRole};
use uuid::Uuid;

use crate::dto::{ScheduleDto, UserDto};
use crate::error::ApplicationError;
use crate::services::presentation_service::{
    CreatePresentationRequest, PresentationService, PresentationServiceDependencies,
};
use crate::services::registration_service::{
    RegisterRequest, RegistrationService, RegistrationServiceDependencies,
};
use crate::services::room_service::{CreateRoomRequest, RoomService, RoomServiceDependencies};
use crate::services::schedule_service::{
    CreateScheduleRequest, ScheduleService, ScheduleServiceDependencies,
};
use crate::services::user_service::{RegisterUserRequest, UserService, UserServiceDependencies};
use crate::testing::{
    FixedClock, InMemoryPresentationRepository, InMemoryRegistrationRepository,
    InMemoryRoomRepository, InMemoryScheduleRepository, InMemoryUserRepository,
    PlainPasswordHasher,
};

struct TestEnv {
    users: UserService,
    registrations: RegistrationService,
    schedule: ScheduleDto,
}

fn at(hour: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()
}

async fn env_with_capacity(seat_count: u32, enforce_capacity: bool) -> TestEnv {
    let user_repository = Arc::new(InMemoryUserRepository::new());
    let room_repository = Arc::new(InMemoryRoomRepository::new());
    let presentation_repository = Arc::new(InMemoryPresentationRepository::new());
    let schedule_repository = Arc::new(InMemoryScheduleRepository::new());
    let registration_repository = Arc::new(InMemoryRegistrationRepository::new());
    let clock = Arc::new(FixedClock(Utc::now()));

    let users = UserService::new(UserServiceDependencies {
        user_repository: user_repository.clone(),
        password_hasher: Arc::new(PlainPasswordHasher),
        clock: clock.clone(),
    });
    let rooms = RoomService::new(RoomServiceDependencies {
        room_repository: room_repository.clone(),
        clock: clock.clone(),
    });
    let presentations = PresentationService::new(PresentationServiceDependencies {
        presentation_repository: presentation_repository.clone(),
        user_repository: user_repository.clone(),
        clock: clock.clone(),
    });
    let schedules = ScheduleService::new(ScheduleServiceDependencies {
        schedule_repository: schedule_repository.clone(),
        room_repository: room_repository.clone(),
        presentation_repository: presentation_repository.clone(),
        user_repository: user_repository.clone(),
        clock: clock.clone(),
    });

    let speaker = users
        .register(RegisterUserRequest {
            first_name: "Speaker".to_string(),
            last_name: "One".to_string(),
            email: "speaker@example.com".to_string(),
            password: "StrongPass123!".to_string(),
            role: UserRole::Presenter,
        })
        .await
        .unwrap();
    let room = rooms
        .create(CreateRoomRequest {
            name: "Hall".to_string(),
            seat_count,
        })
        .await
        .unwrap();
    let presentation = presentations
        .create(CreatePresentationRequest {
            operator_id: speaker.code,
            title: "Talk".to_string(),
            description: "abstract".to_string(),
            presenters: vec![speaker.code],
        })
        .await
        .unwrap();
    let schedule = schedules
        .create(CreateScheduleRequest {
            operator_id: speaker.code,
            room_id: room.code,
            presentation_id: presentation.code,
            start_time: at(10),
            end_time: at(11),
        })
        .await
        .unwrap();

    let registrations = RegistrationService::new(RegistrationServiceDependencies {
        registration_repository,
        schedule_repository,
        room_repository,
        user_repository,
        clock,
        enforce_capacity,
    });

    TestEnv {
        users,
        registrations,
        schedule,
    }
}

async fn env() -> TestEnv {
    env_with_capacity(50, false).await
}

async fn listener(env: &TestEnv, email: &str) -> UserDto {
    env.users
        .register(RegisterUserRequest {
            first_name: "Listener".to_string(),
            last_name: "One".to_string(),
            email: email.to_string(),
            password: "StrongPass123!".to_string(),
            role: UserRole::Listener,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn listener_registers_once() {
    let env = env().await;
    let user = listener(&env, "b@example.com").await;

    let dto = env
        .registrations
        .register(RegisterRequest {
            operator_id: user.code,
            schedule_id: env.schedule.code,
        })
        .await
        .unwrap();
    assert_eq!(dto.user_code, user.code);
    assert_eq!(dto.schedule_code, env.schedule.code);

    let result = env
        .registrations
        .register(RegisterRequest {
            operator_id: user.code,
            schedule_id: env.schedule.code,
        })
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::AlreadyRegistered))
    ));
}

#[tokio::test]
async fn delete_then_reregister_succeeds() {
    let env = env().await;
    let user = listener(&env, "b@example.com").await;

    let dto = env
        .registrations
        .register(RegisterRequest {
            operator_id: user.code,
            schedule_id: env.schedule.code,
        })
        .await
        .unwrap();

    env.registrations
        .unregister(user.code, dto.code)
        .await
        .unwrap();

    assert!(env
        .registrations
        .register(RegisterRequest {
            operator_id: user.code,
            schedule_id: env.schedule.code,
        })
        .await
        .is_ok());
}

#[tokio::test]
async fn presenter_role_cannot_register() {
    let env = env().await;
    let speaker = env
        .users
        .register(RegisterUserRequest {
            first_name: "Another".to_string(),
            last_name: "Speaker".to_string(),
            email: "speaker2@example.com".to_string(),
            password: "StrongPass123!".to_string(),
            role: UserRole::Presenter,
        })
        .await
        .unwrap();

    let result = env
        .registrations
        .register(RegisterRequest {
            operator_id: speaker.code,
            schedule_id: env.schedule.code,
        })
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InsufficientPermissions))
    ));
}

#[tokio::test]
async fn cannot_remove_someone_elses_registration() {
    let env = env().await;
    let owner = listener(&env, "owner@example.com").await;
    let other = listener(&env, "other@example.com").await;

    let dto = env
        .registrations
        .register(RegisterRequest {
            operator_id: owner.code,
            schedule_id: env.schedule.code,
        })
        .await
        .unwrap();

    let result = env.registrations.unregister(other.code, dto.code).await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InsufficientPermissions))
    ));
}

#[tokio::test]
async fn unregister_of_unknown_registration_is_not_found() {
    let env = env().await;
    let user = listener(&env, "b@example.com").await;

    let result = env
        .registrations
        .unregister(user.code, Uuid::new_v4())
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::RegistrationNotFound))
    ));
}

#[tokio::test]
async fn unknown_schedule_is_not_found() {
    let env = env().await;
    let user = listener(&env, "b@example.com").await;

    let result = env
        .registrations
        .register(RegisterRequest {
            operator_id: user.code,
            schedule_id: Uuid::new_v4(),
        })
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::ScheduleNotFound))
    ));
}

#[tokio::test]
async fn capacity_is_only_enforced_when_configured() {
    // 默认不限制：两个座位，三个听众都能报上
    let env = env_with_capacity(2, false).await;
    for email in ["a@example.com", "b@example.com", "c@example.com"] {
        let user = listener(&env, email).await;
        env.registrations
            .register(RegisterRequest {
                operator_id: user.code,
                schedule_id: env.schedule.code,
            })
            .await
            .unwrap();
    }

    // 开启后第三个被拒
    let env = env_with_capacity(2, true).await;
    for email in ["a@example.com", "b@example.com"] {
        let user = listener(&env, email).await;
        env.registrations
            .register(RegisterRequest {
                operator_id: user.code,
                schedule_id: env.schedule.code,
            })
            .await
            .unwrap();
    }
    let third = listener(&env, "c@example.com").await;
    let result = env
        .registrations
        .register(RegisterRequest {
            operator_id: third.code,
            schedule_id: env.schedule.code,
        })
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::RoomFull))
    ));
}
