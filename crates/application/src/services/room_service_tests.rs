//! 房间服务单元测试

use std::sync::Arc;

use chrono::Utc;
use domain::DomainError;
use uuid::Uuid;

use crate::error::ApplicationError;
use crate::services::room_service::{CreateRoomRequest, RoomService, RoomServiceDependencies};
use crate::testing::{FixedClock, InMemoryRoomRepository};

fn service() -> RoomService {
    RoomService::new(RoomServiceDependencies {
        room_repository: Arc::new(InMemoryRoomRepository::new()),
        clock: Arc::new(FixedClock(Utc::now())),
    })
}

#[tokio::test]
async fn create_and_list() {
    let service = service();
    let room = service
        .create(CreateRoomRequest {
            name: "Main Hall".to_string(),
            seat_count: 120,
        })
        .await
        .unwrap();
    assert_eq!(room.name, "Main Hall");
    assert_eq!(room.seat_count, 120);

    let rooms = service.list().await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].code, room.code);
}

#[tokio::test]
async fn duplicate_name_is_rejected() {
    let service = service();
    service
        .create(CreateRoomRequest {
            name: "Main Hall".to_string(),
            seat_count: 120,
        })
        .await
        .unwrap();

    let result = service
        .create(CreateRoomRequest {
            name: "Main Hall".to_string(),
            seat_count: 30,
        })
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::RoomNameTaken))
    ));
}

#[tokio::test]
async fn unknown_room_is_not_found() {
    let service = service();
    let result = service.get(Uuid::new_v4()).await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::RoomNotFound))
    ));
}
