mod presentation_repository_impl;
mod registration_repository_impl;
mod room_repository_impl;
mod schedule_repository_impl;
mod user_repository_impl;

pub use presentation_repository_impl::PgPresentationRepository;
pub use registration_repository_impl::PgRegistrationRepository;
pub use room_repository_impl::PgRoomRepository;
pub use schedule_repository_impl::PgScheduleRepository;
pub use user_repository_impl::PgUserRepository;

use domain::{RepositoryError, UserRole};

pub(crate) fn role_to_str(role: UserRole) -> &'static str {
    match role {
        UserRole::Listener => "listener",
        UserRole::Presenter => "presenter",
    }
}

pub(crate) fn parse_role(value: &str) -> Result<UserRole, RepositoryError> {
    match value {
        "listener" => Ok(UserRole::Listener),
        "presenter" => Ok(UserRole::Presenter),
        other => Err(RepositoryError::database(format!(
            "unknown user role in storage: {other}"
        ))),
    }
}
