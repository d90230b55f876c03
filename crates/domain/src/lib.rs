//! 会议系统核心领域模型
//!
//! 包含用户、房间、演讲、排期、报名等核心实体，
//! 以及时间段冲突检测与基于关系的授权规则。

pub mod authorization;
pub mod errors;
pub mod presentation;
pub mod presenter;
pub mod registration;
pub mod room;
pub mod schedule;
pub mod user;
pub mod value_objects;

// 重新导出常用类型
pub use authorization::*;
pub use errors::*;
pub use presentation::*;
pub use presenter::*;
pub use registration::*;
pub use room::*;
pub use schedule::*;
pub use user::*;
pub use value_objects::*;
