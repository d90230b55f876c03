//! 内存版的适配器实现，供单元测试与集成测试使用。
//!
//! 写路径在写锁内复查唯一性与区间重叠，
//! 与生产库的约束语义保持一致。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use domain::{
    overlapping_schedules, PasswordHash, Presentation, PresentationId, Presenter, Registration,
    RegistrationId, RepositoryError, Room, RoomId, Schedule, ScheduleId, Timestamp, User,
    UserEmail, UserId,
};
use tokio::sync::RwLock;

use crate::clock::Clock;
use crate::password::{PasswordHasher, PasswordHasherError};
use crate::repository::{
    PresentationRepository, RegistrationRepository, RoomRepository, ScheduleRepository,
    UserRepository,
};

/// 固定时间的时钟，便于断言时间戳。
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// 不做真实哈希的实现，测试里省掉 bcrypt 的开销。
#[derive(Default)]
pub struct PlainPasswordHasher;

#[async_trait]
impl PasswordHasher for PlainPasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError> {
        PasswordHash::new(format!("plain:{plaintext}"))
            .map_err(|err| PasswordHasherError::hash_error(err.to_string()))
    }

    async fn verify(
        &self,
        plaintext: &str,
        hashed: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        Ok(hashed.as_str() == format!("plain:{plaintext}"))
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        if users.values().any(|stored| stored.email == user.email) {
            return Err(RepositoryError::Conflict);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(RepositoryError::NotFound);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &UserEmail) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| &user.email == email)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryRoomRepository {
    rooms: Arc<RwLock<HashMap<RoomId, Room>>>,
}

impl InMemoryRoomRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn create(&self, room: Room) -> Result<Room, RepositoryError> {
        let mut rooms = self.rooms.write().await;
        if rooms.values().any(|stored| stored.name == room.name) {
            return Err(RepositoryError::Conflict);
        }
        rooms.insert(room.id, room.clone());
        Ok(room)
    }

    async fn find_by_id(&self, id: RoomId) -> Result<Option<Room>, RepositoryError> {
        Ok(self.rooms.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Room>, RepositoryError> {
        Ok(self
            .rooms
            .read()
            .await
            .values()
            .find(|room| room.name == name)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Room>, RepositoryError> {
        Ok(self.rooms.read().await.values().cloned().collect())
    }
}

#[derive(Default)]
pub struct InMemoryPresentationRepository {
    presentations: Arc<RwLock<HashMap<PresentationId, Presentation>>>,
    presenters: Arc<RwLock<Vec<Presenter>>>,
}

impl InMemoryPresentationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresentationRepository for InMemoryPresentationRepository {
    async fn create(
        &self,
        presentation: Presentation,
        presenters: Vec<Presenter>,
    ) -> Result<Presentation, RepositoryError> {
        let mut stored = self.presentations.write().await;
        let mut links = self.presenters.write().await;
        stored.insert(presentation.id, presentation.clone());
        links.extend(presenters);
        Ok(presentation)
    }

    async fn update(&self, presentation: Presentation) -> Result<Presentation, RepositoryError> {
        let mut stored = self.presentations.write().await;
        if !stored.contains_key(&presentation.id) {
            return Err(RepositoryError::NotFound);
        }
        stored.insert(presentation.id, presentation.clone());
        Ok(presentation)
    }

    async fn replace_presenters(
        &self,
        presentation_id: PresentationId,
        presenters: Vec<Presenter>,
    ) -> Result<(), RepositoryError> {
        let mut links = self.presenters.write().await;
        links.retain(|link| link.presentation_id != presentation_id);
        links.extend(presenters);
        Ok(())
    }

    async fn delete(&self, id: PresentationId) -> Result<(), RepositoryError> {
        let mut stored = self.presentations.write().await;
        if stored.remove(&id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        self.presenters
            .write()
            .await
            .retain(|link| link.presentation_id != id);
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: PresentationId,
    ) -> Result<Option<Presentation>, RepositoryError> {
        Ok(self.presentations.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Presentation>, RepositoryError> {
        Ok(self.presentations.read().await.values().cloned().collect())
    }

    async fn list_presenters(
        &self,
        presentation_id: PresentationId,
    ) -> Result<Vec<Presenter>, RepositoryError> {
        Ok(self
            .presenters
            .read()
            .await
            .iter()
            .filter(|link| link.presentation_id == presentation_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryScheduleRepository {
    schedules: Arc<RwLock<HashMap<ScheduleId, Schedule>>>,
}

impl InMemoryScheduleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryScheduleRepository {
    async fn create(&self, schedule: Schedule) -> Result<Schedule, RepositoryError> {
        let mut schedules = self.schedules.write().await;

        // 同演讲只允许一条排期
        if schedules
            .values()
            .any(|stored| stored.presentation_id == schedule.presentation_id)
        {
            return Err(RepositoryError::Conflict);
        }

        // 写锁内复查重叠，对应生产库的排他约束
        let same_room: Vec<Schedule> = schedules
            .values()
            .filter(|stored| stored.room_id == schedule.room_id)
            .cloned()
            .collect();
        if !overlapping_schedules(&schedule.slot, &same_room, None).is_empty() {
            return Err(RepositoryError::Conflict);
        }

        schedules.insert(schedule.id, schedule.clone());
        Ok(schedule)
    }

    async fn update(&self, schedule: Schedule) -> Result<Schedule, RepositoryError> {
        let mut schedules = self.schedules.write().await;
        if !schedules.contains_key(&schedule.id) {
            return Err(RepositoryError::NotFound);
        }

        let same_room: Vec<Schedule> = schedules
            .values()
            .filter(|stored| stored.room_id == schedule.room_id)
            .cloned()
            .collect();
        if !overlapping_schedules(&schedule.slot, &same_room, Some(schedule.id)).is_empty() {
            return Err(RepositoryError::Conflict);
        }

        schedules.insert(schedule.id, schedule.clone());
        Ok(schedule)
    }

    async fn delete(&self, id: ScheduleId) -> Result<(), RepositoryError> {
        let mut schedules = self.schedules.write().await;
        if schedules.remove(&id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn find_by_id(&self, id: ScheduleId) -> Result<Option<Schedule>, RepositoryError> {
        Ok(self.schedules.read().await.get(&id).cloned())
    }

    async fn find_by_presentation(
        &self,
        presentation_id: PresentationId,
    ) -> Result<Option<Schedule>, RepositoryError> {
        Ok(self
            .schedules
            .read()
            .await
            .values()
            .find(|schedule| schedule.presentation_id == presentation_id)
            .cloned())
    }

    async fn list_by_room(&self, room_id: RoomId) -> Result<Vec<Schedule>, RepositoryError> {
        Ok(self
            .schedules
            .read()
            .await
            .values()
            .filter(|schedule| schedule.room_id == room_id)
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<Schedule>, RepositoryError> {
        Ok(self.schedules.read().await.values().cloned().collect())
    }
}

#[derive(Default)]
pub struct InMemoryRegistrationRepository {
    registrations: Arc<RwLock<HashMap<RegistrationId, Registration>>>,
}

impl InMemoryRegistrationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryRegistrationRepository {
    async fn create(&self, registration: Registration) -> Result<Registration, RepositoryError> {
        let mut registrations = self.registrations.write().await;
        if registrations.values().any(|stored| {
            stored.schedule_id == registration.schedule_id
                && stored.user_id == registration.user_id
        }) {
            return Err(RepositoryError::Conflict);
        }
        registrations.insert(registration.id, registration.clone());
        Ok(registration)
    }

    async fn delete(&self, id: RegistrationId) -> Result<(), RepositoryError> {
        let mut registrations = self.registrations.write().await;
        if registrations.remove(&id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: RegistrationId,
    ) -> Result<Option<Registration>, RepositoryError> {
        Ok(self.registrations.read().await.get(&id).cloned())
    }

    async fn find_by_schedule_and_user(
        &self,
        schedule_id: ScheduleId,
        user_id: UserId,
    ) -> Result<Option<Registration>, RepositoryError> {
        Ok(self
            .registrations
            .read()
            .await
            .values()
            .find(|registration| {
                registration.schedule_id == schedule_id && registration.user_id == user_id
            })
            .cloned())
    }

    async fn count_by_schedule(&self, schedule_id: ScheduleId) -> Result<u64, RepositoryError> {
        Ok(self
            .registrations
            .read()
            .await
            .values()
            .filter(|registration| registration.schedule_id == schedule_id)
            .count() as u64)
    }
}
