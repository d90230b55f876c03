use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::value_objects::{PresentationId, Timestamp};

/// 演讲。演讲者关联是独立的 [`crate::Presenter`] 记录，
/// 排期最多存在一条（由存储层唯一约束保证）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub id: PresentationId,
    pub title: String,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Presentation {
    pub fn new(
        id: PresentationId,
        title: impl Into<String>,
        description: impl Into<String>,
        now: Timestamp,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            id,
            title: Self::validate_title(title.into())?,
            description: description.into(),
            created_at: now,
            updated_at: now,
        })
    }

    /// 部分更新：只有给出的字段会被覆盖。
    pub fn update_details(
        &mut self,
        title: Option<String>,
        description: Option<String>,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        if let Some(value) = title {
            self.title = Self::validate_title(value)?;
        }
        if let Some(value) = description {
            self.description = value;
        }
        self.updated_at = now;
        Ok(())
    }

    fn validate_title(value: String) -> Result<String, DomainError> {
        let value = value.trim().to_owned();
        if value.is_empty() {
            return Err(DomainError::invalid_argument("title", "cannot be empty"));
        }
        if value.len() > 64 {
            return Err(DomainError::invalid_argument("title", "too long"));
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn partial_update_keeps_missing_fields() {
        let mut presentation = Presentation::new(
            PresentationId::new(Uuid::new_v4()),
            "Rust at scale",
            "how we shipped it",
            Utc::now(),
        )
        .unwrap();

        presentation
            .update_details(None, Some("revised abstract".to_owned()), Utc::now())
            .unwrap();

        assert_eq!(presentation.title, "Rust at scale");
        assert_eq!(presentation.description, "revised abstract");
    }
}
