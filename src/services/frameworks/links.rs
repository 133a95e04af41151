use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::FrameworkService;
use crate::errors::Result;
use crate::models::access::entities::Permission;
use crate::models::frameworks::entities::{
    LinkKind, MAX_LINK_LEVEL, MIN_LINK_LEVEL, OutcomeLink, is_valid_level,
};
use crate::models::frameworks::requests::{CreateLinkRequest, UpdateLinkRequest};
use crate::models::{ApiResponse, ErrorCode, ListResponse};
use crate::storage::Storage;

/// 映射校验失败的原因
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LinkRejection {
    Invalid(String),
    Duplicate,
}

impl LinkRejection {
    pub(crate) fn message(&self) -> String {
        match self {
            LinkRejection::Invalid(msg) => msg.clone(),
            LinkRejection::Duplicate => "该映射已存在".to_string(),
        }
    }

    fn response(&self) -> HttpResponse {
        let code = match self {
            LinkRejection::Invalid(_) => ErrorCode::LinkInvalid,
            LinkRejection::Duplicate => ErrorCode::LinkAlreadyExists,
        };
        HttpResponse::BadRequest().json(ApiResponse::error_empty(code, self.message()))
    }
}

pub(crate) fn level_error(level: i32) -> Option<LinkRejection> {
    (!is_valid_level(level)).then(|| {
        LinkRejection::Invalid(format!(
            "映射强度必须在 {MIN_LINK_LEVEL} 到 {MAX_LINK_LEVEL} 之间，当前为 {level}"
        ))
    })
}

/// 校验映射两端属于同一方案、强度合法且未重复
pub(crate) async fn check_new_link(
    storage: &Arc<dyn Storage>,
    framework_id: i64,
    kind: LinkKind,
    source_id: i64,
    target_id: i64,
    level: i32,
) -> Result<Option<LinkRejection>> {
    if let Some(rejection) = level_error(level) {
        return Ok(Some(rejection));
    }

    let (source_kind, target_kind) = kind.ends();
    for (outcome_kind, id) in [(source_kind, source_id), (target_kind, target_id)] {
        match storage.get_outcome(outcome_kind, id).await? {
            Some(outcome) if outcome.framework_id == framework_id => {}
            Some(_) => {
                return Ok(Some(LinkRejection::Invalid(format!(
                    "{} {id} 不属于该培养方案",
                    outcome_kind.label()
                ))));
            }
            None => {
                return Ok(Some(LinkRejection::Invalid(format!(
                    "{} {id} 不存在",
                    outcome_kind.label()
                ))));
            }
        }
    }

    if storage
        .find_link(kind, source_id, target_id)
        .await?
        .is_some()
    {
        return Ok(Some(LinkRejection::Duplicate));
    }

    Ok(None)
}

/// 载入方案内的映射（以上位端归属判断）
async fn load_link(
    storage: &Arc<dyn Storage>,
    framework_id: i64,
    kind: LinkKind,
    id: i64,
) -> Result<Option<OutcomeLink>> {
    let Some(link) = storage.get_link(kind, id).await? else {
        return Ok(None);
    };
    let source = storage.get_outcome(kind.ends().0, link.source_id).await?;
    Ok(source
        .filter(|o| o.framework_id == framework_id)
        .map(|_| link))
}

pub async fn list_links(
    service: &FrameworkService,
    framework_id: i64,
    kind: LinkKind,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, _) = service
        .authorize(request, framework_id, Permission::FrameworkView)
        .await?;

    match storage.list_links(kind, framework_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ListResponse::new(items),
            "Links retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list links: {e}"),
            )),
        ),
    }
}

pub async fn create_link(
    service: &FrameworkService,
    framework_id: i64,
    kind: LinkKind,
    req: CreateLinkRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, _) = service
        .authorize(request, framework_id, Permission::FrameworkManage)
        .await?;

    if let Some(rejection) = check_new_link(
        &storage,
        framework_id,
        kind,
        req.source_id,
        req.target_id,
        req.level,
    )
    .await?
    {
        return Ok(rejection.response());
    }

    match storage
        .create_link(kind, req.source_id, req.target_id, req.level)
        .await
    {
        Ok(link) => Ok(HttpResponse::Created().json(ApiResponse::success(
            link,
            "Link created successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create link: {e}"),
            )),
        ),
    }
}

pub async fn update_link(
    service: &FrameworkService,
    framework_id: i64,
    kind: LinkKind,
    link_id: i64,
    req: UpdateLinkRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, _) = service
        .authorize(request, framework_id, Permission::FrameworkManage)
        .await?;

    if let Some(rejection) = level_error(req.level) {
        return Ok(rejection.response());
    }
    if load_link(&storage, framework_id, kind, link_id)
        .await?
        .is_none()
    {
        return Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::LinkNotFound, "Link not found")));
    }

    match storage.update_link_level(kind, link_id, req.level).await {
        Ok(Some(link)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            link,
            "Link updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::LinkNotFound, "Link not found"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update link: {e}"),
            )),
        ),
    }
}

pub async fn delete_link(
    service: &FrameworkService,
    framework_id: i64,
    kind: LinkKind,
    link_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, _) = service
        .authorize(request, framework_id, Permission::FrameworkManage)
        .await?;

    if load_link(&storage, framework_id, kind, link_id)
        .await?
        .is_none()
    {
        return Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::LinkNotFound, "Link not found")));
    }

    match storage.delete_link(kind, link_id).await {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
            "Link deleted successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to delete link: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_levels_are_rejected() {
        assert!(level_error(1).is_none());
        assert!(level_error(4).is_none());
        assert!(matches!(level_error(0), Some(LinkRejection::Invalid(_))));
        assert!(level_error(5).unwrap().message().contains("1 到 4"));
    }
}
