pub mod auth_service;
pub mod presentation_service;
pub mod registration_service;
pub mod room_service;
pub mod schedule_service;
pub mod user_service;

pub use auth_service::{AuthService, AuthServiceDependencies, LoginRequest};
pub use presentation_service::{
    CreatePresentationRequest, PresentationService, PresentationServiceDependencies,
    UpdatePresentationRequest,
};
pub use registration_service::{
    RegisterRequest, RegistrationService, RegistrationServiceDependencies,
};
pub use room_service::{CreateRoomRequest, RoomService, RoomServiceDependencies};
pub use schedule_service::{
    CreateScheduleRequest, ScheduleService, ScheduleServiceDependencies, UpdateScheduleRequest,
};
pub use user_service::{
    RegisterUserRequest, UpdateUserRequest, UserService, UserServiceDependencies,
};

#[cfg(test)]
mod auth_service_tests;
#[cfg(test)]
mod presentation_service_tests;
#[cfg(test)]
mod registration_service_tests;
#[cfg(test)]
mod room_service_tests;
