//! 请求认证
//!
//! 从 Authorization 头解析 Bearer token，交由 TokenService 验证。

use application::TokenService;
use axum::http::HeaderMap;
use uuid::Uuid;

use crate::error::ApiError;

fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthorized("Invalid authorization header format"))
}

/// 解析当前请求的身份，失败时返回 401。
pub fn authenticated_user(
    token_service: &TokenService,
    headers: &HeaderMap,
) -> Result<Uuid, ApiError> {
    let token = bearer_token(headers)?;
    let user_id = token_service.verify_access_token(token)?;
    Ok(user_id.into())
}
