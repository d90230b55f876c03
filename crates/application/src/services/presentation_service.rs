use std::sync::Arc;

use domain::{
    authorization, Presentation, PresentationId, Presenter, User, UserId,
};
use uuid::Uuid;

use crate::{
    clock::Clock, dto::PresentationDto, error::ApplicationError,
    repository::{PresentationRepository, UserRepository},
};

#[derive(Debug, Clone)]
pub struct CreatePresentationRequest {
    pub operator_id: Uuid,
    pub title: String,
    pub description: String,
    pub presenters: Vec<Uuid>,
}

#[derive(Debug, Clone)]
pub struct UpdatePresentationRequest {
    pub operator_id: Uuid,
    pub presentation_id: Uuid,
    pub title: Option<String>,
    pub description: Option<String>,
    /// 给出时整表替换演讲者列表，而不是做差量合并。
    pub presenters: Option<Vec<Uuid>>,
}

pub struct PresentationServiceDependencies {
    pub presentation_repository: Arc<dyn PresentationRepository>,
    pub user_repository: Arc<dyn UserRepository>,
    pub clock: Arc<dyn Clock>,
}

pub struct PresentationService {
    deps: PresentationServiceDependencies,
}

impl PresentationService {
    pub fn new(deps: PresentationServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn create(
        &self,
        request: CreatePresentationRequest,
    ) -> Result<PresentationDto, ApplicationError> {
        let operator = self.load_operator(request.operator_id).await?;
        authorization::ensure_can_create_presentation(&operator)?;

        let now = self.deps.clock.now();
        let presentation = Presentation::new(
            PresentationId::from(Uuid::new_v4()),
            request.title,
            request.description,
            now,
        )?;

        // 每个演讲者先解析、先校验角色，之后才落库；
        // 记录与关联在仓储里同一个事务提交。
        let links = self
            .resolve_presenters(presentation.id, &request.presenters)
            .await?;

        let stored = self
            .deps
            .presentation_repository
            .create(presentation, links.clone())
            .await?;

        tracing::info!(presentation = %stored.id, "presentation created");
        Ok(PresentationDto::from_parts(&stored, &links))
    }

    pub async fn update(
        &self,
        request: UpdatePresentationRequest,
    ) -> Result<PresentationDto, ApplicationError> {
        let presentation_id = PresentationId::from(request.presentation_id);
        let mut presentation = self
            .deps
            .presentation_repository
            .find_by_id(presentation_id)
            .await?
            .ok_or(domain::DomainError::PresentationNotFound)?;

        let links = self
            .deps
            .presentation_repository
            .list_presenters(presentation_id)
            .await?;
        authorization::ensure_presenter_of(UserId::from(request.operator_id), &links)?;

        presentation.update_details(
            request.title,
            request.description,
            self.deps.clock.now(),
        )?;

        // 新演讲者列表先整体解析、校验，之后才允许任何写入；
        // 校验失败时标题等字段更新也不落库。
        let new_links = match request.presenters {
            Some(presenter_ids) => {
                Some(self.resolve_presenters(presentation_id, &presenter_ids).await?)
            }
            None => None,
        };

        let stored = self
            .deps
            .presentation_repository
            .update(presentation)
            .await?;

        let links = match new_links {
            Some(links) => {
                self.deps
                    .presentation_repository
                    .replace_presenters(presentation_id, links.clone())
                    .await?;
                links
            }
            None => links,
        };

        Ok(PresentationDto::from_parts(&stored, &links))
    }

    pub async fn delete(&self, operator_id: Uuid, presentation_id: Uuid) -> Result<(), ApplicationError> {
        let presentation_id = PresentationId::from(presentation_id);
        self.deps
            .presentation_repository
            .find_by_id(presentation_id)
            .await?
            .ok_or(domain::DomainError::PresentationNotFound)?;

        let links = self
            .deps
            .presentation_repository
            .list_presenters(presentation_id)
            .await?;
        authorization::ensure_presenter_of(UserId::from(operator_id), &links)?;

        self.deps
            .presentation_repository
            .delete(presentation_id)
            .await?;
        tracing::info!(presentation = %presentation_id, "presentation deleted");
        Ok(())
    }

    pub async fn get(&self, presentation_id: Uuid) -> Result<PresentationDto, ApplicationError> {
        let presentation_id = PresentationId::from(presentation_id);
        let presentation = self
            .deps
            .presentation_repository
            .find_by_id(presentation_id)
            .await?
            .ok_or(domain::DomainError::PresentationNotFound)?;
        let links = self
            .deps
            .presentation_repository
            .list_presenters(presentation_id)
            .await?;
        Ok(PresentationDto::from_parts(&presentation, &links))
    }

    pub async fn list(&self) -> Result<Vec<PresentationDto>, ApplicationError> {
        let presentations = self.deps.presentation_repository.list().await?;
        let mut dtos = Vec::with_capacity(presentations.len());
        for presentation in &presentations {
            let links = self
                .deps
                .presentation_repository
                .list_presenters(presentation.id)
                .await?;
            dtos.push(PresentationDto::from_parts(presentation, &links));
        }
        Ok(dtos)
    }

    async fn load_operator(&self, operator_id: Uuid) -> Result<User, ApplicationError> {
        self.deps
            .user_repository
            .find_by_id(UserId::from(operator_id))
            .await?
            .ok_or_else(|| domain::DomainError::UserNotFound.into())
    }

    async fn resolve_presenters(
        &self,
        presentation_id: PresentationId,
        presenter_ids: &[Uuid],
    ) -> Result<Vec<Presenter>, ApplicationError> {
        let now = self.deps.clock.now();
        let mut links = Vec::with_capacity(presenter_ids.len());
        for presenter_id in presenter_ids {
            let user = self
                .deps
                .user_repository
                .find_by_id(UserId::from(*presenter_id))
                .await?
                .ok_or(domain::DomainError::UserNotFound)?;
            links.push(Presenter::link(presentation_id, &user, now)?);
        }
        Ok(links)
    }
}
