use std::sync::Arc;

use application::{
    AuthService, PresentationService, RegistrationService, RoomService, ScheduleService,
    TokenService, UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub room_service: Arc<RoomService>,
    pub presentation_service: Arc<PresentationService>,
    pub schedule_service: Arc<ScheduleService>,
    pub registration_service: Arc<RegistrationService>,
    pub token_service: Arc<TokenService>,
}
