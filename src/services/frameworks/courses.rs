use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FrameworkService;
use super::outcomes::reject_if_clos_in_use;
use crate::models::access::entities::Permission;
use crate::models::frameworks::entities::OutcomeKind;
use crate::models::frameworks::requests::{CreateCourseRequest, UpdateCourseRequest};
use crate::models::{ApiResponse, ErrorCode, ListResponse};
use crate::utils::validate::{validate_code, validate_required_text};

fn validate_course_numbers(credits: Option<i32>, semester: Option<i32>) -> Result<(), String> {
    if let Some(credits) = credits
        && !(0..=30).contains(&credits)
    {
        return Err("学分必须在 0 到 30 之间".to_string());
    }
    if let Some(semester) = semester
        && !(1..=12).contains(&semester)
    {
        return Err("学期必须在 1 到 12 之间".to_string());
    }
    Ok(())
}

pub async fn list_courses(
    service: &FrameworkService,
    framework_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, _) = service
        .authorize(request, framework_id, Permission::FrameworkView)
        .await?;

    match storage.list_courses(framework_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ListResponse::new(items),
            "Courses retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list courses: {e}"),
            )),
        ),
    }
}

pub async fn create_course(
    service: &FrameworkService,
    framework_id: i64,
    mut req: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, _) = service
        .authorize(request, framework_id, Permission::FrameworkManage)
        .await?;

    req.code = req.code.trim().to_string();
    req.name = req.name.trim().to_string();
    if let Err(msg) = validate_code(&req.code) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }
    if let Err(msg) = validate_required_text(&req.name, 200)
        .and_then(|_| validate_course_numbers(Some(req.credits), req.semester))
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    if storage
        .get_course_by_code(framework_id, &req.code)
        .await?
        .is_some()
    {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::CourseAlreadyExists,
            format!("课程代码 {} 已存在", req.code),
        )));
    }

    match storage.create_course(framework_id, req).await {
        Ok(course) => Ok(HttpResponse::Created().json(ApiResponse::success(
            course,
            "Course created successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to create course: {e}"),
            )),
        ),
    }
}

pub async fn update_course(
    service: &FrameworkService,
    framework_id: i64,
    course_id: i64,
    mut req: UpdateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, _) = service
        .authorize(request, framework_id, Permission::FrameworkManage)
        .await?;

    match storage.get_course_by_id(course_id).await? {
        Some(course) if course.framework_id == framework_id => {}
        _ => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::CourseNotFound, "Course not found")));
        }
    }

    if let Some(code) = req.code.take() {
        let code = code.trim().to_string();
        if let Err(msg) = validate_code(&code) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
        if let Some(other) = storage.get_course_by_code(framework_id, &code).await?
            && other.id != course_id
        {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::CourseAlreadyExists,
                format!("课程代码 {code} 已存在"),
            )));
        }
        req.code = Some(code);
    }
    if let Some(name) = &req.name
        && let Err(msg) = validate_required_text(name, 200)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }
    if let Err(msg) = validate_course_numbers(req.credits, req.semester) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    match storage.update_course(course_id, req).await {
        Ok(Some(course)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            course,
            "Course updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::CourseNotFound, "Course not found"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to update course: {e}"),
            )),
        ),
    }
}

/// 删除课程，所属 CLO 随外键级联删除；CLO 仍被量表引用时拒绝
pub async fn delete_course(
    service: &FrameworkService,
    framework_id: i64,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, _) = service
        .authorize(request, framework_id, Permission::FrameworkManage)
        .await?;

    match storage.get_course_by_id(course_id).await? {
        Some(course) if course.framework_id == framework_id => {}
        _ => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::CourseNotFound, "Course not found")));
        }
    }

    let clo_ids = storage
        .list_outcomes(OutcomeKind::Clo, framework_id)
        .await?
        .into_iter()
        .filter(|clo| clo.course_id == Some(course_id))
        .map(|clo| clo.id)
        .collect::<Vec<_>>();
    if let Some(rejected) = reject_if_clos_in_use(&storage, framework_id, &clo_ids).await? {
        return Ok(rejected);
    }

    match storage.delete_course(course_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
            "Course deleted successfully",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::CourseNotFound, "Course not found"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to delete course: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_numbers_are_range_checked() {
        assert!(validate_course_numbers(Some(3), Some(1)).is_ok());
        assert!(validate_course_numbers(None, None).is_ok());
        assert!(validate_course_numbers(Some(-1), None).is_err());
        assert!(validate_course_numbers(Some(3), Some(0)).is_err());
        assert!(validate_course_numbers(Some(3), Some(13)).is_err());
    }
}
