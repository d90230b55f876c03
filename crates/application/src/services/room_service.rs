use std::sync::Arc;

use domain::{RepositoryError, Room, RoomId};
use uuid::Uuid;

use crate::{clock::Clock, dto::RoomDto, error::ApplicationError, repository::RoomRepository};

#[derive(Debug, Clone)]
pub struct CreateRoomRequest {
    pub name: String,
    pub seat_count: u32,
}

pub struct RoomServiceDependencies {
    pub room_repository: Arc<dyn RoomRepository>,
    pub clock: Arc<dyn Clock>,
}

pub struct RoomService {
    deps: RoomServiceDependencies,
}

impl RoomService {
    pub fn new(deps: RoomServiceDependencies) -> Self {
        Self { deps }
    }

    /// 任何已认证身份都可以建房间（沿用观察到的策略）。
    pub async fn create(&self, request: CreateRoomRequest) -> Result<RoomDto, ApplicationError> {
        let room = Room::new(
            RoomId::from(Uuid::new_v4()),
            request.name,
            request.seat_count,
            self.deps.clock.now(),
        )?;

        if self
            .deps
            .room_repository
            .find_by_name(&room.name)
            .await?
            .is_some()
        {
            return Err(domain::DomainError::RoomNameTaken.into());
        }

        let stored = match self.deps.room_repository.create(room).await {
            Ok(room) => room,
            Err(RepositoryError::Conflict) => {
                return Err(domain::DomainError::RoomNameTaken.into())
            }
            Err(err) => return Err(err.into()),
        };

        tracing::info!(room = %stored.id, name = %stored.name, "room created");
        Ok(RoomDto::from(&stored))
    }

    pub async fn get(&self, room_id: Uuid) -> Result<RoomDto, ApplicationError> {
        let room = self
            .deps
            .room_repository
            .find_by_id(RoomId::from(room_id))
            .await?
            .ok_or(domain::DomainError::RoomNotFound)?;
        Ok(RoomDto::from(&room))
    }

    pub async fn list(&self) -> Result<Vec<RoomDto>, ApplicationError> {
        let rooms = self.deps.room_repository.list().await?;
        Ok(rooms.iter().map(RoomDto::from).collect())
    }
}
