//! 会话生命周期测试：登录、刷新、轮换与撤销

use std::sync::Arc;

use chrono::Utc;
use config::AuthConfig;
use domain::UserRole;

use crate::dto::UserDto;
use crate::error::ApplicationError;
use crate::services::auth_service::{AuthService, AuthServiceDependencies, LoginRequest};
use crate::services::user_service::{RegisterUserRequest, UserService, UserServiceDependencies};
use crate::testing::{FixedClock, InMemoryUserRepository, PlainPasswordHasher};
use crate::token::TokenService;

struct TestEnv {
    users: UserService,
    auth: AuthService,
    tokens: Arc<TokenService>,
}

fn env() -> TestEnv {
    let user_repository = Arc::new(InMemoryUserRepository::new());
    let password_hasher = Arc::new(PlainPasswordHasher);
    let clock = Arc::new(FixedClock(Utc::now()));
    let tokens = Arc::new(TokenService::new(&AuthConfig {
        secret: "auth-service-test-secret".to_string(),
        access_token_expire_minutes: 15,
        refresh_token_expire_days: 7,
    }));

    TestEnv {
        users: UserService::new(UserServiceDependencies {
            user_repository: user_repository.clone(),
            password_hasher: password_hasher.clone(),
            clock: clock.clone(),
        }),
        auth: AuthService::new(AuthServiceDependencies {
            user_repository,
            password_hasher,
            token_service: tokens.clone(),
            clock,
        }),
        tokens,
    }
}

async fn register(env: &TestEnv, email: &str) -> UserDto {
    env.users
        .register(RegisterUserRequest {
            first_name: "Joan".to_string(),
            last_name: "Clarke".to_string(),
            email: email.to_string(),
            password: "StrongPass123!".to_string(),
            role: UserRole::Listener,
        })
        .await
        .unwrap()
}

fn login(email: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: "StrongPass123!".to_string(),
    }
}

#[tokio::test]
async fn login_issues_verifiable_tokens() {
    let env = env();
    let user = register(&env, "joan@example.com").await;

    let pair = env.auth.login(login("joan@example.com")).await.unwrap();
    assert_eq!(pair.token_type, "bearer");

    let subject = env.tokens.verify_access_token(&pair.access_token).unwrap();
    assert_eq!(uuid::Uuid::from(subject), user.code);
}

#[tokio::test]
async fn wrong_password_is_unauthenticated() {
    let env = env();
    register(&env, "joan@example.com").await;

    let result = env
        .auth
        .login(LoginRequest {
            email: "joan@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await;
    assert!(matches!(result, Err(ApplicationError::Authentication)));
}

#[tokio::test]
async fn unknown_email_is_unauthenticated() {
    let env = env();
    let result = env.auth.login(login("ghost@example.com")).await;
    assert!(matches!(result, Err(ApplicationError::Authentication)));
}

#[tokio::test]
async fn refresh_returns_new_access_and_same_refresh() {
    let env = env();
    register(&env, "joan@example.com").await;

    let pair = env.auth.login(login("joan@example.com")).await.unwrap();
    let refreshed = env.auth.refresh(&pair.refresh_token).await.unwrap();

    assert_eq!(refreshed.refresh_token, pair.refresh_token);
    assert!(env
        .tokens
        .verify_access_token(&refreshed.access_token)
        .is_ok());
}

#[tokio::test]
async fn second_login_rotates_and_invalidates_previous_refresh_token() {
    let env = env();
    register(&env, "joan@example.com").await;

    let first = env.auth.login(login("joan@example.com")).await.unwrap();
    let second = env.auth.login(login("joan@example.com")).await.unwrap();

    // 旧令牌签名仍有效，但与存储值不再一致
    let result = env.auth.refresh(&first.refresh_token).await;
    assert!(matches!(result, Err(ApplicationError::Authentication)));

    assert!(env.auth.refresh(&second.refresh_token).await.is_ok());
}

#[tokio::test]
async fn logout_revokes_refresh_token_before_expiry() {
    let env = env();
    let user = register(&env, "joan@example.com").await;

    let pair = env.auth.login(login("joan@example.com")).await.unwrap();
    env.auth.logout(user.code).await.unwrap();

    let result = env.auth.refresh(&pair.refresh_token).await;
    assert!(matches!(result, Err(ApplicationError::Authentication)));
}

#[tokio::test]
async fn garbled_refresh_token_is_rejected() {
    let env = env();
    let result = env.auth.refresh("not-a-token").await;
    assert!(matches!(result, Err(ApplicationError::Token(_))));
}
