//! 应用层实现。
//!
//! 这里提供围绕领域模型的用例服务，处理资源加载与授权顺序、
//! 事务边界，以及对外部适配器（密码哈希、令牌签发、时钟）的抽象。

pub mod clock;
pub mod dto;
pub mod error;
pub mod password;
pub mod repository;
pub mod services;
pub mod token;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use clock::{Clock, SystemClock};
pub use dto::{
    PresentationDto, RegistrationDto, RoomDto, ScheduleDto, TokenPairDto, UserDto,
};
pub use error::ApplicationError;
pub use password::{PasswordHasher, PasswordHasherError};
pub use repository::{
    PresentationRepository, RegistrationRepository, RoomRepository, ScheduleRepository,
    UserRepository,
};
pub use services::{
    AuthService, AuthServiceDependencies, PresentationService, PresentationServiceDependencies,
    RegistrationService, RegistrationServiceDependencies, RoomService, RoomServiceDependencies,
    ScheduleService, ScheduleServiceDependencies, UserService, UserServiceDependencies,
};
pub use token::{TokenError, TokenService};
