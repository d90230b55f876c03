use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{PasswordHash, Timestamp, UserEmail, UserId};

/// 登出时写入的刷新令牌哨兵值，任何真实令牌都无法与之匹配。
pub const REVOKED_REFRESH_TOKEN: &str = "_";

/// 用户角色。封闭集合，所有授权判定处都要求穷尽匹配，
/// 新增角色是一次编译期可见的改动。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Listener,
    Presenter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: UserEmail,
    #[serde(skip_serializing)] // 密码字段不暴露给客户端
    pub password: PasswordHash,
    pub role: UserRole,
    #[serde(skip_serializing)]
    pub refresh_token: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    pub fn register(
        id: UserId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: UserEmail,
        password: PasswordHash,
        role: UserRole,
        now: Timestamp,
    ) -> Result<Self, DomainError> {
        let first_name = Self::validate_name("first_name", first_name.into())?;
        let last_name = Self::validate_name("last_name", last_name.into())?;
        Ok(Self {
            id,
            first_name,
            last_name,
            email,
            password,
            role,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_profile(
        &mut self,
        first_name: Option<String>,
        last_name: Option<String>,
        email: Option<UserEmail>,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        if let Some(value) = first_name {
            self.first_name = Self::validate_name("first_name", value)?;
        }
        if let Some(value) = last_name {
            self.last_name = Self::validate_name("last_name", value)?;
        }
        if let Some(value) = email {
            self.email = value;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn set_password(&mut self, password: PasswordHash, now: Timestamp) {
        self.password = password;
        self.updated_at = now;
    }

    /// 登录时轮换刷新令牌，旧令牌从此无法通过比对。
    pub fn store_refresh_token(&mut self, token: impl Into<String>, now: Timestamp) {
        self.refresh_token = Some(token.into());
        self.updated_at = now;
    }

    /// 登出：用哨兵值覆盖存储的刷新令牌，即使旧令牌尚未过期也永久失效。
    pub fn revoke_refresh_token(&mut self, now: Timestamp) {
        self.refresh_token = Some(REVOKED_REFRESH_TOKEN.to_owned());
        self.updated_at = now;
    }

    /// 比对客户端出示的刷新令牌与存储值。
    /// 空值或哨兵值一律视为已撤销。
    pub fn refresh_token_matches(&self, presented: &str) -> bool {
        match self.refresh_token.as_deref() {
            None | Some("") | Some(REVOKED_REFRESH_TOKEN) => false,
            Some(stored) => stored == presented,
        }
    }

    fn validate_name(field: &'static str, value: String) -> Result<String, DomainError> {
        let value = value.trim().to_owned();
        if value.is_empty() {
            return Err(DomainError::invalid_argument(field, "cannot be empty"));
        }
        if value.len() > 255 {
            return Err(DomainError::invalid_argument(field, "too long"));
        }
        Ok(value)
    }
}
