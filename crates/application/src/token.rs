//! 访问令牌与刷新令牌的签发、校验。
//!
//! 两种令牌用同一把对称密钥和 HS256 签名（沿用观察到的实现），
//! 载荷只有 `sub` 与 `exp`。校验本身无副作用；刷新令牌与用户
//! 存储值的比对是 AuthService 的职责，不在这里。

use chrono::Duration;
use config::AuthConfig;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use domain::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("invalid token")]
    Malformed,
    #[error("token generation failed: {0}")]
    Generation(String),
}

/// `jti` 保证同一秒内签发的两枚令牌也互不相同，
/// 否则快速连续登录会生成相同的刷新令牌，令轮换失效。
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    exp: i64,
    jti: Uuid,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_ttl: Duration::minutes(config.access_token_expire_minutes),
            refresh_ttl: Duration::days(config.refresh_token_expire_days),
        }
    }

    /// 签发访问令牌，短有效期（默认 15 分钟）限制泄露后的影响面。
    pub fn issue_access_token(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue(user_id, self.access_ttl)
    }

    /// 签发刷新令牌（默认 7 天）。调用方必须把返回值写回用户记录，
    /// 覆盖旧值完成轮换。
    pub fn issue_refresh_token(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue(user_id, self.refresh_ttl)
    }

    pub fn verify_access_token(&self, token: &str) -> Result<UserId, TokenError> {
        self.verify(token)
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<UserId, TokenError> {
        self.verify(token)
    }

    fn issue(&self, user_id: UserId, ttl: Duration) -> Result<String, TokenError> {
        let claims = Claims {
            sub: user_id.into(),
            exp: (chrono::Utc::now() + ttl).timestamp(),
            jti: Uuid::new_v4(),
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| TokenError::Generation(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(UserId::new(data.claims.sub)),
            Err(err) => match err.kind() {
                ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                _ => Err(TokenError::Malformed),
            },
        }
    }
}
