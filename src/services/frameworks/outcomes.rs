use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::FrameworkService;
use crate::errors::{AqmsError, Result};
use crate::models::access::entities::Permission;
use crate::models::frameworks::entities::{Outcome, OutcomeKind};
use crate::models::frameworks::requests::{CreateOutcomeRequest, UpdateOutcomeRequest};
use crate::models::{ApiResponse, ErrorCode, ListResponse};
use crate::storage::Storage;
use crate::utils::validate::{validate_code, validate_required_text};

/// 成果描述最大长度
pub(crate) const MAX_DESCRIPTION_CHARS: usize = 2000;

/// CLO 的课程必须属于同一方案
pub(crate) async fn ensure_course_in_framework(
    storage: &Arc<dyn Storage>,
    framework_id: i64,
    course_id: i64,
) -> Result<()> {
    match storage.get_course_by_id(course_id).await? {
        Some(course) if course.framework_id == framework_id => Ok(()),
        Some(_) => Err(AqmsError::validation(format!(
            "课程 {course_id} 不属于该培养方案"
        ))),
        None => Err(AqmsError::validation(format!("课程 {course_id} 不存在"))),
    }
}

/// 仍被量表定义行引用的 CLO 不能删除，返回拒绝响应
pub(crate) async fn reject_if_clos_in_use(
    storage: &Arc<dyn Storage>,
    framework_id: i64,
    clo_ids: &[i64],
) -> Result<Option<HttpResponse>> {
    let rubrics = storage
        .find_rubrics_referencing_clos(framework_id, clo_ids)
        .await?;
    if rubrics.is_empty() {
        return Ok(None);
    }

    let titles = rubrics
        .iter()
        .map(|r| r.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Ok(Some(HttpResponse::BadRequest().json(
        ApiResponse::error_empty(
            ErrorCode::OutcomeInUse,
            format!("CLO is still referenced by rubrics: {titles}"),
        ),
    )))
}

/// 载入方案内的成果
async fn load_outcome(
    storage: &Arc<dyn Storage>,
    framework_id: i64,
    kind: OutcomeKind,
    id: i64,
) -> Result<Option<Outcome>> {
    Ok(storage
        .get_outcome(kind, id)
        .await?
        .filter(|o| o.framework_id == framework_id))
}

pub async fn list_outcomes(
    service: &FrameworkService,
    framework_id: i64,
    kind: OutcomeKind,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, _) = service
        .authorize(request, framework_id, Permission::FrameworkView)
        .await?;

    match storage.list_outcomes(kind, framework_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ListResponse::new(items),
            format!("{} list retrieved successfully", kind.label()),
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list {}: {e}", kind.label()),
            )),
        ),
    }
}

pub async fn create_outcome(
    service: &FrameworkService,
    framework_id: i64,
    kind: OutcomeKind,
    mut req: CreateOutcomeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, _) = service
        .authorize(request, framework_id, Permission::FrameworkManage)
        .await?;

    req.code = req.code.trim().to_string();
    req.description = req.description.trim().to_string();
    if let Err(msg) = validate_code(&req.code) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }
    if let Err(msg) = validate_required_text(&req.description, MAX_DESCRIPTION_CHARS) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    match (kind, req.course_id) {
        (OutcomeKind::Clo, Some(course_id)) => {
            ensure_course_in_framework(&storage, framework_id, course_id).await?
        }
        (OutcomeKind::Clo, None) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "CLO 必须指定所属课程 course_id",
            )));
        }
        // PLO / PI 不关联课程
        _ => req.course_id = None,
    }

    if storage
        .get_outcome_by_code(kind, framework_id, &req.code)
        .await?
        .is_some()
    {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::OutcomeAlreadyExists,
            format!("{} 代码 {} 已存在", kind.label(), req.code),
        )));
    }

    match storage.create_outcome(kind, framework_id, req).await {
        Ok(outcome) => Ok(HttpResponse::Created().json(ApiResponse::success(
            outcome,
            format!("{} created successfully", kind.label()),
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create {}: {e}", kind.label()),
            )),
        ),
    }
}

pub async fn update_outcome(
    service: &FrameworkService,
    framework_id: i64,
    kind: OutcomeKind,
    outcome_id: i64,
    mut req: UpdateOutcomeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, _) = service
        .authorize(request, framework_id, Permission::FrameworkManage)
        .await?;

    if load_outcome(&storage, framework_id, kind, outcome_id)
        .await?
        .is_none()
    {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::OutcomeNotFound,
            format!("{} not found", kind.label()),
        )));
    }

    if let Some(code) = req.code.take() {
        let code = code.trim().to_string();
        if let Err(msg) = validate_code(&code) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
        if let Some(other) = storage.get_outcome_by_code(kind, framework_id, &code).await?
            && other.id != outcome_id
        {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::OutcomeAlreadyExists,
                format!("{} 代码 {code} 已存在", kind.label()),
            )));
        }
        req.code = Some(code);
    }
    if let Some(description) = &req.description
        && let Err(msg) = validate_required_text(description, MAX_DESCRIPTION_CHARS)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }
    match (kind, req.course_id) {
        (OutcomeKind::Clo, Some(course_id)) => {
            ensure_course_in_framework(&storage, framework_id, course_id).await?
        }
        (OutcomeKind::Clo, None) => {}
        _ => req.course_id = None,
    }

    match storage.update_outcome(kind, outcome_id, req).await {
        Ok(Some(outcome)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            outcome,
            format!("{} updated successfully", kind.label()),
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::OutcomeNotFound,
            format!("{} not found", kind.label()),
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update {}: {e}", kind.label()),
            )),
        ),
    }
}

/// 删除成果，相关映射随外键级联删除；被量表引用的 CLO 拒绝删除
pub async fn delete_outcome(
    service: &FrameworkService,
    framework_id: i64,
    kind: OutcomeKind,
    outcome_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, _) = service
        .authorize(request, framework_id, Permission::FrameworkManage)
        .await?;

    if load_outcome(&storage, framework_id, kind, outcome_id)
        .await?
        .is_none()
    {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::OutcomeNotFound,
            format!("{} not found", kind.label()),
        )));
    }
    if kind == OutcomeKind::Clo
        && let Some(rejected) =
            reject_if_clos_in_use(&storage, framework_id, &[outcome_id]).await?
    {
        return Ok(rejected);
    }

    match storage.delete_outcome(kind, outcome_id).await {
        Ok(_) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(format!(
            "{} deleted successfully",
            kind.label()
        )))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to delete {}: {e}", kind.label()),
            )),
        ),
    }
}
