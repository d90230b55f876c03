//! 主应用程序入口
//!
//! 装配仓储、服务与路由，启动 Axum Web API 服务。

use std::sync::Arc;

use application::{
    AuthService, AuthServiceDependencies, PresentationService, PresentationServiceDependencies,
    RegistrationService, RegistrationServiceDependencies, RoomService, RoomServiceDependencies,
    ScheduleService, ScheduleServiceDependencies, SystemClock, TokenService, UserService,
    UserServiceDependencies,
};
use config::AppConfig;
use infrastructure::{
    create_pg_pool, BcryptPasswordHasher, PgPresentationRepository, PgRegistrationRepository,
    PgRoomRepository, PgScheduleRepository, PgUserRepository,
};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let app_config = AppConfig::from_env();

    tracing::info!(
        "连接数据库: {}",
        app_config
            .database
            .url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );

    let pg_pool = create_pg_pool(&app_config.database.url, app_config.database.max_connections)
        .await?;

    // 运行迁移
    sqlx::migrate!("../../migrations").run(&pg_pool).await?;

    let user_repository = Arc::new(PgUserRepository::new(pg_pool.clone()));
    let room_repository = Arc::new(PgRoomRepository::new(pg_pool.clone()));
    let presentation_repository = Arc::new(PgPresentationRepository::new(pg_pool.clone()));
    let schedule_repository = Arc::new(PgScheduleRepository::new(pg_pool.clone()));
    let registration_repository = Arc::new(PgRegistrationRepository::new(pg_pool));

    let password_hasher: Arc<dyn application::PasswordHasher> =
        Arc::new(BcryptPasswordHasher::new(app_config.server.bcrypt_cost));
    let clock: Arc<dyn application::Clock> = Arc::new(SystemClock);
    let token_service = Arc::new(TokenService::new(&app_config.auth));

    let state = AppState {
        user_service: Arc::new(UserService::new(UserServiceDependencies {
            user_repository: user_repository.clone(),
            password_hasher: password_hasher.clone(),
            clock: clock.clone(),
        })),
        auth_service: Arc::new(AuthService::new(AuthServiceDependencies {
            user_repository: user_repository.clone(),
            password_hasher: password_hasher.clone(),
            token_service: token_service.clone(),
            clock: clock.clone(),
        })),
        room_service: Arc::new(RoomService::new(RoomServiceDependencies {
            room_repository: room_repository.clone(),
            clock: clock.clone(),
        })),
        presentation_service: Arc::new(PresentationService::new(
            PresentationServiceDependencies {
                presentation_repository: presentation_repository.clone(),
                user_repository: user_repository.clone(),
                clock: clock.clone(),
            },
        )),
        schedule_service: Arc::new(ScheduleService::new(ScheduleServiceDependencies {
            schedule_repository: schedule_repository.clone(),
            room_repository: room_repository.clone(),
            presentation_repository: presentation_repository.clone(),
            user_repository: user_repository.clone(),
            clock: clock.clone(),
        })),
        registration_service: Arc::new(RegistrationService::new(
            RegistrationServiceDependencies {
                registration_repository,
                schedule_repository,
                room_repository,
                user_repository,
                clock,
                enforce_capacity: app_config.server.enforce_capacity,
            },
        )),
        token_service,
    };

    let app = router(state);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("会议服务启动在 http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
