use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::access::entities::Permission;
use crate::models::access::requests::{
    AssignRoleRequest, CreateDepartmentRequest, CreateRoleRequest, UpdateDepartmentRequest,
    UpdateRoleRequest,
};
use crate::services::AccessService;
use crate::utils::{SafeIDI64, SafeUserIdI64};

static ACCESS_SERVICE: Lazy<AccessService> = Lazy::new(AccessService::new_lazy);

// 院系
pub async fn list_departments(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACCESS_SERVICE.list_departments(&req).await
}

pub async fn create_department(
    req: HttpRequest,
    body: web::Json<CreateDepartmentRequest>,
) -> ActixResult<HttpResponse> {
    ACCESS_SERVICE.create_department(body.into_inner(), &req).await
}

pub async fn update_department(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateDepartmentRequest>,
) -> ActixResult<HttpResponse> {
    ACCESS_SERVICE
        .update_department(id.0, body.into_inner(), &req)
        .await
}

pub async fn delete_department(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACCESS_SERVICE.delete_department(id.0, &req).await
}

// 角色
pub async fn list_roles(req: HttpRequest) -> ActixResult<HttpResponse> {
    ACCESS_SERVICE.list_roles(&req).await
}

pub async fn get_role(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACCESS_SERVICE.get_role(id.0, &req).await
}

pub async fn create_role(
    req: HttpRequest,
    body: web::Json<CreateRoleRequest>,
) -> ActixResult<HttpResponse> {
    ACCESS_SERVICE.create_role(body.into_inner(), &req).await
}

pub async fn update_role(
    req: HttpRequest,
    id: SafeIDI64,
    body: web::Json<UpdateRoleRequest>,
) -> ActixResult<HttpResponse> {
    ACCESS_SERVICE.update_role(id.0, body.into_inner(), &req).await
}

pub async fn delete_role(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACCESS_SERVICE.delete_role(id.0, &req).await
}

// 角色分配
pub async fn list_assignments(
    req: HttpRequest,
    user_id: SafeUserIdI64,
) -> ActixResult<HttpResponse> {
    ACCESS_SERVICE.list_assignments(user_id.0, &req).await
}

pub async fn assign_role(
    req: HttpRequest,
    user_id: SafeUserIdI64,
    body: web::Json<AssignRoleRequest>,
) -> ActixResult<HttpResponse> {
    ACCESS_SERVICE
        .assign_role(user_id.0, body.into_inner(), &req)
        .await
}

pub async fn revoke_role(
    req: HttpRequest,
    user_id: SafeUserIdI64,
    id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ACCESS_SERVICE.revoke_role(user_id.0, id.0, &req).await
}

// 配置路由
pub fn configure_access_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/access")
            .wrap(middlewares::RequirePermission::new(Permission::RoleManage))
            .wrap(middlewares::RequireJWT)
            .route("/departments", web::get().to(list_departments))
            .route("/departments", web::post().to(create_department))
            .route("/departments/{id}", web::put().to(update_department))
            .route("/departments/{id}", web::delete().to(delete_department))
            .route("/roles", web::get().to(list_roles))
            .route("/roles", web::post().to(create_role))
            .route("/roles/{id}", web::get().to(get_role))
            .route("/roles/{id}", web::put().to(update_role))
            .route("/roles/{id}", web::delete().to(delete_role))
            .route("/users/{user_id}/roles", web::get().to(list_assignments))
            .route("/users/{user_id}/roles", web::post().to(assign_role))
            .route("/users/{user_id}/roles/{id}", web::delete().to(revoke_role)),
    );
}
