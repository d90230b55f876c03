use domain::{
    Presentation, Presenter, Registration, Room, Schedule, Timestamp, User, UserRole,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserDto {
    pub code: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&User> for UserDto {
    fn from(user: &User) -> Self {
        Self {
            code: Uuid::from(user.id),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.as_str().to_owned(),
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPairDto {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl TokenPairDto {
    pub fn bearer(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "bearer".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDto {
    pub code: Uuid,
    pub name: String,
    pub seat_count: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Room> for RoomDto {
    fn from(room: &Room) -> Self {
        Self {
            code: Uuid::from(room.id),
            name: room.name.clone(),
            seat_count: room.seat_count,
            created_at: room.created_at,
            updated_at: room.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationDto {
    pub code: Uuid,
    pub title: String,
    pub description: String,
    pub presenters: Vec<Uuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PresentationDto {
    pub fn from_parts(presentation: &Presentation, presenters: &[Presenter]) -> Self {
        Self {
            code: Uuid::from(presentation.id),
            title: presentation.title.clone(),
            description: presentation.description.clone(),
            presenters: presenters
                .iter()
                .map(|link| Uuid::from(link.user_id))
                .collect(),
            created_at: presentation.created_at,
            updated_at: presentation.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDto {
    pub code: Uuid,
    pub room_code: Uuid,
    pub presentation_code: Uuid,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Schedule> for ScheduleDto {
    fn from(schedule: &Schedule) -> Self {
        Self {
            code: Uuid::from(schedule.id),
            room_code: Uuid::from(schedule.room_id),
            presentation_code: Uuid::from(schedule.presentation_id),
            start_time: schedule.slot.start(),
            end_time: schedule.slot.end(),
            created_at: schedule.created_at,
            updated_at: schedule.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationDto {
    pub code: Uuid,
    pub schedule_code: Uuid,
    pub user_code: Uuid,
    pub registered_at: Timestamp,
}

impl From<&Registration> for RegistrationDto {
    fn from(registration: &Registration) -> Self {
        Self {
            code: Uuid::from(registration.id),
            schedule_code: Uuid::from(registration.schedule_id),
            user_code: Uuid::from(registration.user_id),
            registered_at: registration.registered_at,
        }
    }
}
