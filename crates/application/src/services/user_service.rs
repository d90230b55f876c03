use std::sync::Arc;

use domain::{PasswordHash, RepositoryError, User, UserEmail, UserId, UserRole};
use uuid::Uuid;

use crate::{
    clock::Clock, dto::UserDto, error::ApplicationError, password::PasswordHasher,
    repository::UserRepository,
};

#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// 部分更新：缺省字段保持现值，密码给出时重新哈希。
#[derive(Debug, Clone)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

pub struct UserServiceDependencies {
    pub user_repository: Arc<dyn UserRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
}

pub struct UserService {
    deps: UserServiceDependencies,
}

impl UserService {
    pub fn new(deps: UserServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn register(
        &self,
        request: RegisterUserRequest,
    ) -> Result<UserDto, ApplicationError> {
        let email = UserEmail::parse(request.email)?;

        if self
            .deps
            .user_repository
            .find_by_email(&email)
            .await?
            .is_some()
        {
            return Err(domain::DomainError::EmailAlreadyRegistered.into());
        }

        let password_hash: PasswordHash =
            self.deps.password_hasher.hash(&request.password).await?;

        let now = self.deps.clock.now();
        let user = User::register(
            UserId::from(Uuid::new_v4()),
            request.first_name,
            request.last_name,
            email,
            password_hash,
            request.role,
            now,
        )?;

        let stored = match self.deps.user_repository.create(user).await {
            Ok(user) => user,
            // 并发的同邮箱注册，败者拿到唯一约束冲突
            Err(RepositoryError::Conflict) => {
                return Err(domain::DomainError::EmailAlreadyRegistered.into())
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(user = %stored.id, "user registered");
        Ok(UserDto::from(&stored))
    }

    pub async fn update_user(
        &self,
        user_id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<UserDto, ApplicationError> {
        let mut user = self
            .deps
            .user_repository
            .find_by_id(UserId::from(user_id))
            .await?
            .ok_or(domain::DomainError::UserNotFound)?;

        let now = self.deps.clock.now();

        let email = match request.email {
            Some(raw) => {
                let email = UserEmail::parse(raw)?;
                if email != user.email
                    && self
                        .deps
                        .user_repository
                        .find_by_email(&email)
                        .await?
                        .is_some()
                {
                    return Err(domain::DomainError::EmailAlreadyRegistered.into());
                }
                Some(email)
            }
            None => None,
        };

        user.update_profile(request.first_name, request.last_name, email, now)?;

        if let Some(password) = request.password {
            let hash = self.deps.password_hasher.hash(&password).await?;
            user.set_password(hash, now);
        }

        let stored = match self.deps.user_repository.update(user).await {
            Ok(user) => user,
            Err(RepositoryError::Conflict) => {
                return Err(domain::DomainError::EmailAlreadyRegistered.into())
            }
            Err(err) => return Err(err.into()),
        };

        Ok(UserDto::from(&stored))
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<UserDto, ApplicationError> {
        let user = self
            .deps
            .user_repository
            .find_by_id(UserId::from(user_id))
            .await?
            .ok_or(domain::DomainError::UserNotFound)?;
        Ok(UserDto::from(&user))
    }
}
