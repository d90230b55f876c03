//! 演讲聚合测试：创建时的角色校验、演讲者整表替换、关系授权

use std::sync::Arc;

use chrono::Utc;
use domain::{DomainError, UserRole};

use crate::dto::UserDto;
use crate::error::ApplicationError;
use crate::services::presentation_service::{
    CreatePresentationRequest, PresentationService, PresentationServiceDependencies,
    UpdatePresentationRequest,
};
use crate::services::user_service::{RegisterUserRequest, UserService, UserServiceDependencies};
use crate::testing::{
    FixedClock, InMemoryPresentationRepository, InMemoryUserRepository, PlainPasswordHasher,
};

struct TestEnv {
    users: UserService,
    presentations: PresentationService,
}

fn env() -> TestEnv {
    let user_repository = Arc::new(InMemoryUserRepository::new());
    let clock = Arc::new(FixedClock(Utc::now()));

    TestEnv {
        users: UserService::new(UserServiceDependencies {
            user_repository: user_repository.clone(),
            password_hasher: Arc::new(PlainPasswordHasher),
            clock: clock.clone(),
        }),
        presentations: PresentationService::new(PresentationServiceDependencies {
            presentation_repository: Arc::new(InMemoryPresentationRepository::new()),
            user_repository,
            clock,
        }),
    }
}

async fn register(env: &TestEnv, email: &str, role: UserRole) -> UserDto {
    env.users
        .register(RegisterUserRequest {
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            password: "StrongPass123!".to_string(),
            role,
        })
        .await
        .unwrap()
}

fn create_request(operator: &UserDto, presenters: Vec<uuid::Uuid>) -> CreatePresentationRequest {
    CreatePresentationRequest {
        operator_id: operator.code,
        title: "Borrow checker deep dive".to_string(),
        description: "lifetimes in practice".to_string(),
        presenters,
    }
}

#[tokio::test]
async fn presenter_creates_presentation_with_links() {
    let env = env();
    let speaker = register(&env, "speaker@example.com", UserRole::Presenter).await;

    let dto = env
        .presentations
        .create(create_request(&speaker, vec![speaker.code]))
        .await
        .unwrap();

    assert_eq!(dto.title, "Borrow checker deep dive");
    assert_eq!(dto.presenters, vec![speaker.code]);
}

#[tokio::test]
async fn listener_cannot_create() {
    let env = env();
    let listener = register(&env, "listener@example.com", UserRole::Listener).await;

    let result = env
        .presentations
        .create(create_request(&listener, vec![]))
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InsufficientPermissions))
    ));
}

#[tokio::test]
async fn listener_in_presenter_list_aborts_creation() {
    let env = env();
    let speaker = register(&env, "speaker@example.com", UserRole::Presenter).await;
    let listener = register(&env, "listener@example.com", UserRole::Listener).await;

    let result = env
        .presentations
        .create(create_request(&speaker, vec![speaker.code, listener.code]))
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::PresenterRoleRequired))
    ));

    // 角色校验失败时不应留下半成品记录
    assert!(env.presentations.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn listener_in_presenter_list_aborts_update() {
    let env = env();
    let speaker = register(&env, "speaker@example.com", UserRole::Presenter).await;
    let listener = register(&env, "listener@example.com", UserRole::Listener).await;

    let dto = env
        .presentations
        .create(create_request(&speaker, vec![speaker.code]))
        .await
        .unwrap();

    let result = env
        .presentations
        .update(UpdatePresentationRequest {
            operator_id: speaker.code,
            presentation_id: dto.code,
            title: Some("Hijacked title".to_string()),
            description: None,
            presenters: Some(vec![listener.code]),
        })
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::PresenterRoleRequired))
    ));

    // 校验失败时同一次请求里的字段更新也不能落库
    let stored = env.presentations.get(dto.code).await.unwrap();
    assert_eq!(stored.title, "Borrow checker deep dive");
    assert_eq!(stored.presenters, vec![speaker.code]);
}

#[tokio::test]
async fn only_linked_presenter_may_update() {
    let env = env();
    let speaker = register(&env, "speaker@example.com", UserRole::Presenter).await;
    let outsider = register(&env, "outsider@example.com", UserRole::Presenter).await;

    let dto = env
        .presentations
        .create(create_request(&speaker, vec![speaker.code]))
        .await
        .unwrap();

    let result = env
        .presentations
        .update(UpdatePresentationRequest {
            operator_id: outsider.code,
            presentation_id: dto.code,
            title: Some("Hijacked".to_string()),
            description: None,
            presenters: None,
        })
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InsufficientPermissions))
    ));
}

#[tokio::test]
async fn update_merges_partial_fields_and_replaces_presenters() {
    let env = env();
    let speaker = register(&env, "speaker@example.com", UserRole::Presenter).await;
    let cospeaker = register(&env, "cospeaker@example.com", UserRole::Presenter).await;

    let dto = env
        .presentations
        .create(create_request(&speaker, vec![speaker.code]))
        .await
        .unwrap();

    let updated = env
        .presentations
        .update(UpdatePresentationRequest {
            operator_id: speaker.code,
            presentation_id: dto.code,
            title: None,
            description: Some("updated abstract".to_string()),
            presenters: Some(vec![cospeaker.code]),
        })
        .await
        .unwrap();

    assert_eq!(updated.title, "Borrow checker deep dive");
    assert_eq!(updated.description, "updated abstract");
    assert_eq!(updated.presenters, vec![cospeaker.code]);

    // 列表被整表替换后，原演讲者失去修改权
    let result = env
        .presentations
        .delete(speaker.code, dto.code)
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::InsufficientPermissions))
    ));
    assert!(env.presentations.delete(cospeaker.code, dto.code).await.is_ok());
}

#[tokio::test]
async fn missing_presentation_is_reported_before_authorization() {
    let env = env();
    let speaker = register(&env, "speaker@example.com", UserRole::Presenter).await;

    let result = env
        .presentations
        .delete(speaker.code, uuid::Uuid::new_v4())
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::PresentationNotFound))
    ));
}
