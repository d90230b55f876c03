use async_trait::async_trait;
use domain::{
    Presentation, PresentationId, Presenter, Registration, RegistrationId, RepositoryError, Room,
    RoomId, Schedule, ScheduleId, User, UserEmail, UserId,
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> Result<User, RepositoryError>;
    async fn update(&self, user: User) -> Result<User, RepositoryError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    async fn find_by_email(&self, email: &UserEmail) -> Result<Option<User>, RepositoryError>;
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, room: Room) -> Result<Room, RepositoryError>;
    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, RepositoryError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Room>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Room>, RepositoryError>;
}

#[async_trait]
pub trait PresentationRepository: Send + Sync {
    /// 演讲记录与演讲者关联必须写在同一个事务里：
    /// 任何一条关联写入失败，演讲记录也要一并回滚。
    async fn create(
        &self,
        presentation: Presentation,
        presenters: Vec<Presenter>,
    ) -> Result<Presentation, RepositoryError>;
    async fn update(&self, presentation: Presentation) -> Result<Presentation, RepositoryError>;
    /// 全量替换演讲者列表（删旧插新），同样要求原子。
    async fn replace_presenters(
        &self,
        presentation_id: PresentationId,
        presenters: Vec<Presenter>,
    ) -> Result<(), RepositoryError>;
    async fn delete(&self, id: PresentationId) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: PresentationId)
        -> Result<Option<Presentation>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Presentation>, RepositoryError>;
    async fn list_presenters(
        &self,
        presentation_id: PresentationId,
    ) -> Result<Vec<Presenter>, RepositoryError>;
}

#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// 实现必须让「检查-写入」对并发安全：同房间重叠区间的
    /// 两次并发插入，败者以 [`RepositoryError::Conflict`] 返回
    /// （Postgres 实现依赖排他约束，内存实现在写锁内复查）。
    async fn create(&self, schedule: Schedule) -> Result<Schedule, RepositoryError>;
    async fn update(&self, schedule: Schedule) -> Result<Schedule, RepositoryError>;
    async fn delete(&self, id: ScheduleId) -> Result<(), RepositoryError>;
    async fn find_by_id(&self, id: ScheduleId) -> Result<Option<Schedule>, RepositoryError>;
    async fn find_by_presentation(
        &self,
        presentation_id: PresentationId,
    ) -> Result<Option<Schedule>, RepositoryError>;
    /// 冲突检测只需要同房间的排期，按房间扫描而非全表。
    async fn list_by_room(&self, room_id: RoomId) -> Result<Vec<Schedule>, RepositoryError>;
    async fn list(&self) -> Result<Vec<Schedule>, RepositoryError>;
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// (schedule, user) 重复插入以 [`RepositoryError::Conflict`] 返回。
    async fn create(&self, registration: Registration) -> Result<Registration, RepositoryError>;
    async fn delete(&self, id: RegistrationId) -> Result<(), RepositoryError>;
    async fn find_by_id(
        &self,
        id: RegistrationId,
    ) -> Result<Option<Registration>, RepositoryError>;
    async fn find_by_schedule_and_user(
        &self,
        schedule_id: ScheduleId,
        user_id: UserId,
    ) -> Result<Option<Registration>, RepositoryError>;
    async fn count_by_schedule(&self, schedule_id: ScheduleId) -> Result<u64, RepositoryError>;
}
