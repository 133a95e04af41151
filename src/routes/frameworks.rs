use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attainment::requests::AttainmentExportQuery;
use crate::models::frameworks::entities::{LinkKind, OutcomeKind};
use crate::models::frameworks::requests::{
    CreateCourseRequest, CreateFrameworkRequest, CreateLinkRequest, CreateOutcomeRequest,
    FrameworkListQuery, UpdateCourseRequest, UpdateFrameworkRequest, UpdateLinkRequest,
    UpdateOutcomeRequest,
};
use crate::models::students::requests::{CreateStudentRequest, StudentListQuery};
use crate::models::users::entities::AccountType;
use crate::services::{AttainmentService, FrameworkService, StudentService};
use crate::utils::{SafeFrameworkIdI64, SafeIDI64, SafeKind};

static FRAMEWORK_SERVICE: Lazy<FrameworkService> = Lazy::new(FrameworkService::new_lazy);
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);
static ATTAINMENT_SERVICE: Lazy<AttainmentService> = Lazy::new(AttainmentService::new_lazy);

// 培养方案
pub async fn list_frameworks(
    req: HttpRequest,
    query: web::Query<FrameworkListQuery>,
) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE
        .list_frameworks(query.into_inner(), &req)
        .await
}

pub async fn create_framework(
    req: HttpRequest,
    body: web::Json<CreateFrameworkRequest>,
) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE
        .create_framework(body.into_inner(), &req)
        .await
}

pub async fn get_framework(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE.get_framework(id.0, &req).await
}

pub async fn update_framework(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateFrameworkRequest>,
) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE
        .update_framework(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_framework(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE.delete_framework(id.0, &req).await
}

pub async fn get_mappings(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE.get_mappings(framework_id.0, &req).await
}

// 课程
pub async fn list_courses(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE.list_courses(framework_id.0, &req).await
}

pub async fn create_course(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
    body: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE
        .create_course(framework_id.0, body.into_inner(), &req)
        .await
}

pub async fn update_course(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
    id: SafeIDI64,
    body: web::Json<UpdateCourseRequest>,
) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE
        .update_course(framework_id.0, id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_course(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE
        .delete_course(framework_id.0, id.0, &req)
        .await
}

// 学习成果（{kind} = plos | pis | clos）
pub async fn list_outcomes(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
    kind: SafeKind<OutcomeKind>,
) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE
        .list_outcomes(framework_id.0, kind.0, &req)
        .await
}

pub async fn create_outcome(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
    kind: SafeKind<OutcomeKind>,
    body: web::Json<CreateOutcomeRequest>,
) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE
        .create_outcome(framework_id.0, kind.0, body.into_inner(), &req)
        .await
}

pub async fn update_outcome(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
    kind: SafeKind<OutcomeKind>,
    id: SafeIDI64,
    body: web::Json<UpdateOutcomeRequest>,
) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE
        .update_outcome(framework_id.0, kind.0, id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_outcome(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
    kind: SafeKind<OutcomeKind>,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE
        .delete_outcome(framework_id.0, kind.0, id.0, &req)
        .await
}

pub async fn import_outcomes(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
    kind: SafeKind<OutcomeKind>,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE
        .import_outcomes(framework_id.0, kind.0, payload, &req)
        .await
}

// 映射（{kind} = plo-pi | plo-clo | pi-clo）
pub async fn list_links(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
    kind: SafeKind<LinkKind>,
) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE
        .list_links(framework_id.0, kind.0, &req)
        .await
}

pub async fn create_link(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
    kind: SafeKind<LinkKind>,
    body: web::Json<CreateLinkRequest>,
) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE
        .create_link(framework_id.0, kind.0, body.into_inner(), &req)
        .await
}

pub async fn update_link(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
    kind: SafeKind<LinkKind>,
    id: SafeIDI64,
    body: web::Json<UpdateLinkRequest>,
) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE
        .update_link(framework_id.0, kind.0, id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_link(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
    kind: SafeKind<LinkKind>,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    FRAMEWORK_SERVICE
        .delete_link(framework_id.0, kind.0, id.0, &req)
        .await
}

// 方案内学生
pub async fn list_students(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
    query: web::Query<StudentListQuery>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .list_students(framework_id.0, query.into_inner(), &req)
        .await
}

pub async fn create_student(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
    body: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .create_student(framework_id.0, body.into_inner(), &req)
        .await
}

pub async fn import_students(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .import_students(framework_id.0, payload, &req)
        .await
}

// 达成度
pub async fn attainment_summary(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
) -> ActixResult<HttpResponse> {
    ATTAINMENT_SERVICE
        .framework_summary(framework_id.0, &req)
        .await
}

pub async fn export_attainment(
    req: HttpRequest,
    framework_id: SafeFrameworkIdI64,
    query: web::Query<AttainmentExportQuery>,
) -> ActixResult<HttpResponse> {
    ATTAINMENT_SERVICE
        .export(framework_id.0, query.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_framework_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/frameworks")
            .wrap(middlewares::RequireRole::new_any(AccountType::staff_types()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_frameworks))
            .route("", web::post().to(create_framework))
            .route("/{id}", web::get().to(get_framework))
            .route("/{id}", web::put().to(update_framework))
            .route("/{id}", web::delete().to(delete_framework))
            .route("/{framework_id}/mappings", web::get().to(get_mappings))
            .route("/{framework_id}/courses", web::get().to(list_courses))
            .route("/{framework_id}/courses", web::post().to(create_course))
            .route("/{framework_id}/courses/{id}", web::put().to(update_course))
            .route(
                "/{framework_id}/courses/{id}",
                web::delete().to(delete_course),
            )
            .service(
                web::resource("/{framework_id}/outcomes/{kind}/import")
                    .wrap(middlewares::RateLimit::import())
                    .route(web::post().to(import_outcomes)),
            )
            .route(
                "/{framework_id}/outcomes/{kind}",
                web::get().to(list_outcomes),
            )
            .route(
                "/{framework_id}/outcomes/{kind}",
                web::post().to(create_outcome),
            )
            .route(
                "/{framework_id}/outcomes/{kind}/{id}",
                web::put().to(update_outcome),
            )
            .route(
                "/{framework_id}/outcomes/{kind}/{id}",
                web::delete().to(delete_outcome),
            )
            .route("/{framework_id}/links/{kind}", web::get().to(list_links))
            .route("/{framework_id}/links/{kind}", web::post().to(create_link))
            .route(
                "/{framework_id}/links/{kind}/{id}",
                web::put().to(update_link),
            )
            .route(
                "/{framework_id}/links/{kind}/{id}",
                web::delete().to(delete_link),
            )
            .service(
                web::resource("/{framework_id}/students/import")
                    .wrap(middlewares::RateLimit::import())
                    .route(web::post().to(import_students)),
            )
            .route("/{framework_id}/students", web::get().to(list_students))
            .route("/{framework_id}/students", web::post().to(create_student))
            .route(
                "/{framework_id}/attainment",
                web::get().to(attainment_summary),
            )
            .route(
                "/{framework_id}/attainment/export",
                web::get().to(export_attainment),
            ),
    );
}
