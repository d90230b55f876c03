use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, patch, post},
    Form, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use application::services::{
    CreatePresentationRequest, CreateRoomRequest, CreateScheduleRequest, LoginRequest,
    RegisterRequest, RegisterUserRequest, UpdatePresentationRequest, UpdateScheduleRequest,
    UpdateUserRequest,
};
use application::{
    PresentationDto, RegistrationDto, RoomDto, ScheduleDto, TokenPairDto, UserDto,
};
use domain::UserRole;

use crate::auth::authenticated_user;
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize, Validate)]
struct RegisterPayload {
    #[validate(length(min = 1, max = 64))]
    first_name: String,
    #[validate(length(min = 1, max = 64))]
    last_name: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 8, max = 128))]
    password: String,
    role: UserRole,
}

/// OAuth2 password 表单：username 字段承载邮箱。
#[derive(Debug, Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize, Validate)]
struct UpdateUserPayload {
    #[validate(length(min = 1, max = 64))]
    first_name: Option<String>,
    #[validate(length(min = 1, max = 64))]
    last_name: Option<String>,
    #[validate(email)]
    email: Option<String>,
    #[validate(length(min = 8, max = 128))]
    password: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefreshPayload {
    refresh_token: String,
}

#[derive(Debug, Deserialize)]
struct CreateRoomPayload {
    name: String,
    seat_count: u32,
}

#[derive(Debug, Deserialize)]
struct CreatePresentationPayload {
    title: String,
    description: String,
    presenters: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
struct UpdatePresentationPayload {
    title: Option<String>,
    description: Option<String>,
    presenters: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize)]
struct CreateSchedulePayload {
    room_code: Uuid,
    presentation_code: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct UpdateSchedulePayload {
    room_code: Option<Uuid>,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct CreateRegistrationPayload {
    schedule_code: Uuid,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/users", user_routes())
        .nest("/events", event_routes())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/refresh", post(refresh_session))
        .route("/logout", post(logout_user))
        .route("/me", get(current_user).patch(update_current_user))
}

fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/presentation/create", post(create_presentation))
        .route("/presentation/update/{code}", patch(update_presentation))
        .route("/presentation/{code}", delete(delete_presentation))
        .route("/presentations", get(list_presentations))
        .route("/presentations/{code}", get(get_presentation))
        .route("/room/create", post(create_room))
        .route("/rooms", get(list_rooms))
        .route("/room/{code}", get(get_room))
        .route("/schedule/create", post(create_schedule))
        .route("/schedule/update/{code}", patch(update_schedule))
        .route("/schedule/{code}", get(get_schedule).delete(delete_schedule))
        .route("/schedules", get(list_schedules))
        .route("/registration/create", post(create_registration))
        .route("/registration/{code}", delete(delete_registration))
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    payload
        .validate()
        .map_err(|err| ApiError::bad_request(err.to_string()))?;

    let dto = state
        .user_service
        .register(RegisterUserRequest {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            password: payload.password,
            role: payload.role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(dto)))
}

async fn login_user(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenPairDto>, ApiError> {
    let pair = state
        .auth_service
        .login(LoginRequest {
            email: form.username,
            password: form.password,
        })
        .await?;

    Ok(Json(pair))
}

async fn refresh_session(
    State(state): State<AppState>,
    Json(payload): Json<RefreshPayload>,
) -> Result<Json<TokenPairDto>, ApiError> {
    let pair = state.auth_service.refresh(&payload.refresh_token).await?;
    Ok(Json(pair))
}

async fn logout_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let user_id = authenticated_user(&state.token_service, &headers)?;
    state.auth_service.logout(user_id).await?;
    Ok(StatusCode::OK)
}

async fn current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<UserDto>, ApiError> {
    let user_id = authenticated_user(&state.token_service, &headers)?;
    let dto = state.user_service.get_user(user_id).await?;
    Ok(Json(dto))
}

async fn update_current_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Json<UserDto>, ApiError> {
    let user_id = authenticated_user(&state.token_service, &headers)?;
    payload
        .validate()
        .map_err(|err| ApiError::bad_request(err.to_string()))?;

    let dto = state
        .user_service
        .update_user(
            user_id,
            UpdateUserRequest {
                first_name: payload.first_name,
                last_name: payload.last_name,
                email: payload.email,
                password: payload.password,
            },
        )
        .await?;

    Ok(Json(dto))
}

async fn create_presentation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreatePresentationPayload>,
) -> Result<(StatusCode, Json<PresentationDto>), ApiError> {
    let operator_id = authenticated_user(&state.token_service, &headers)?;
    let dto = state
        .presentation_service
        .create(CreatePresentationRequest {
            operator_id,
            title: payload.title,
            description: payload.description,
            presenters: payload.presenters,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(dto)))
}

async fn update_presentation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<Uuid>,
    Json(payload): Json<UpdatePresentationPayload>,
) -> Result<Json<PresentationDto>, ApiError> {
    let operator_id = authenticated_user(&state.token_service, &headers)?;
    let dto = state
        .presentation_service
        .update(UpdatePresentationRequest {
            operator_id,
            presentation_id: code,
            title: payload.title,
            description: payload.description,
            presenters: payload.presenters,
        })
        .await?;

    Ok(Json(dto))
}

async fn delete_presentation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let operator_id = authenticated_user(&state.token_service, &headers)?;
    state.presentation_service.delete(operator_id, code).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_presentations(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<PresentationDto>>, ApiError> {
    authenticated_user(&state.token_service, &headers)?;
    let dtos = state.presentation_service.list().await?;
    Ok(Json(dtos))
}

async fn get_presentation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<Uuid>,
) -> Result<Json<PresentationDto>, ApiError> {
    authenticated_user(&state.token_service, &headers)?;
    let dto = state.presentation_service.get(code).await?;
    Ok(Json(dto))
}

async fn create_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateRoomPayload>,
) -> Result<(StatusCode, Json<RoomDto>), ApiError> {
    authenticated_user(&state.token_service, &headers)?;
    let dto = state
        .room_service
        .create(CreateRoomRequest {
            name: payload.name,
            seat_count: payload.seat_count,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(dto)))
}

async fn list_rooms(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<RoomDto>>, ApiError> {
    authenticated_user(&state.token_service, &headers)?;
    let dtos = state.room_service.list().await?;
    Ok(Json(dtos))
}

async fn get_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<Uuid>,
) -> Result<Json<RoomDto>, ApiError> {
    authenticated_user(&state.token_service, &headers)?;
    let dto = state.room_service.get(code).await?;
    Ok(Json(dto))
}

async fn create_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateSchedulePayload>,
) -> Result<(StatusCode, Json<ScheduleDto>), ApiError> {
    let operator_id = authenticated_user(&state.token_service, &headers)?;
    let dto = state
        .schedule_service
        .create(CreateScheduleRequest {
            operator_id,
            room_id: payload.room_code,
            presentation_id: payload.presentation_code,
            start_time: payload.start_time,
            end_time: payload.end_time,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(dto)))
}

async fn update_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<Uuid>,
    Json(payload): Json<UpdateSchedulePayload>,
) -> Result<Json<ScheduleDto>, ApiError> {
    let operator_id = authenticated_user(&state.token_service, &headers)?;
    let dto = state
        .schedule_service
        .update(UpdateScheduleRequest {
            operator_id,
            schedule_id: code,
            room_id: payload.room_code,
            start_time: payload.start_time,
            end_time: payload.end_time,
        })
        .await?;

    Ok(Json(dto))
}

async fn delete_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let operator_id = authenticated_user(&state.token_service, &headers)?;
    state.schedule_service.delete(operator_id, code).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<Uuid>,
) -> Result<Json<ScheduleDto>, ApiError> {
    authenticated_user(&state.token_service, &headers)?;
    let dto = state.schedule_service.get(code).await?;
    Ok(Json(dto))
}

async fn list_schedules(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<ScheduleDto>>, ApiError> {
    authenticated_user(&state.token_service, &headers)?;
    let dtos = state.schedule_service.list().await?;
    Ok(Json(dtos))
}

async fn create_registration(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateRegistrationPayload>,
) -> Result<(StatusCode, Json<RegistrationDto>), ApiError> {
    let operator_id = authenticated_user(&state.token_service, &headers)?;
    let dto = state
        .registration_service
        .register(RegisterRequest {
            operator_id,
            schedule_id: payload.schedule_code,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(dto)))
}

async fn delete_registration(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(code): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let operator_id = authenticated_user(&state.token_service, &headers)?;
    state
        .registration_service
        .unregister(operator_id, code)
        .await?;
    Ok(StatusCode::OK)
}
