use std::sync::Arc;

use domain::{UserEmail, UserId};
use uuid::Uuid;

use crate::{
    clock::Clock, dto::TokenPairDto, error::ApplicationError, password::PasswordHasher,
    repository::UserRepository, token::TokenService,
};

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub struct AuthServiceDependencies {
    pub user_repository: Arc<dyn UserRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub token_service: Arc<TokenService>,
    pub clock: Arc<dyn Clock>,
}

/// 凭证校验与会话生命周期：登录签发并轮换令牌，
/// 刷新时与存储值比对，登出写入哨兵完成撤销。
pub struct AuthService {
    deps: AuthServiceDependencies,
}

impl AuthService {
    pub fn new(deps: AuthServiceDependencies) -> Self {
        Self { deps }
    }

    /// 校验邮箱与密码，签发新令牌对。新的刷新令牌覆盖存储值，
    /// 旧的刷新令牌从此失效，即使尚未过期。
    pub async fn login(&self, request: LoginRequest) -> Result<TokenPairDto, ApplicationError> {
        let email = UserEmail::parse(request.email).map_err(|_| ApplicationError::Authentication)?;
        let mut user = self
            .deps
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(ApplicationError::Authentication)?;

        let password_ok = self
            .deps
            .password_hasher
            .verify(&request.password, &user.password)
            .await?;
        if !password_ok {
            return Err(ApplicationError::Authentication);
        }

        let access_token = self.deps.token_service.issue_access_token(user.id)?;
        let refresh_token = self.deps.token_service.issue_refresh_token(user.id)?;

        user.store_refresh_token(refresh_token.clone(), self.deps.clock.now());
        self.deps.user_repository.update(user).await?;

        Ok(TokenPairDto::bearer(access_token, refresh_token))
    }

    /// 用刷新令牌换取新的访问令牌，刷新令牌原样返回。
    /// 签名有效但与存储值不一致的令牌视为已撤销。
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPairDto, ApplicationError> {
        let user_id = self.deps.token_service.verify_refresh_token(refresh_token)?;

        let user = self
            .deps
            .user_repository
            .find_by_id(user_id)
            .await?
            .ok_or(ApplicationError::Authentication)?;

        if !user.refresh_token_matches(refresh_token) {
            tracing::warn!(user = %user.id, "refresh attempted with a revoked or rotated token");
            return Err(ApplicationError::Authentication);
        }

        let access_token = self.deps.token_service.issue_access_token(user.id)?;
        Ok(TokenPairDto::bearer(
            access_token,
            refresh_token.to_owned(),
        ))
    }

    /// 登出：覆盖存储的刷新令牌，使当前会话不可再刷新。
    pub async fn logout(&self, user_id: Uuid) -> Result<(), ApplicationError> {
        let mut user = self
            .deps
            .user_repository
            .find_by_id(UserId::from(user_id))
            .await?
            .ok_or(ApplicationError::Authentication)?;

        user.revoke_refresh_token(self.deps.clock.now());
        self.deps.user_repository.update(user).await?;
        Ok(())
    }
}
