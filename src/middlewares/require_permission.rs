/*!
 * 权限验证中间件
 *
 * 需放在 `RequireJWT` 之内。解析当前用户经角色获得的权限集合（管理员直接通过），
 * 要求在任意院系范围内持有指定权限，并把 `PermissionSet` 放入请求扩展，
 * 供处理程序按院系再做细粒度判断。
 *
 * ```rust,ignore
 * web::scope("/api/v1/rubrics")
 *     .wrap(RequirePermission::new(Permission::RubricManage))
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{error, info};

use crate::cache::ObjectCache;
use crate::models::{
    ErrorCode,
    access::entities::{Permission, PermissionSet},
    users::entities::User,
};
use crate::services::access::permissions::load_permission_set;
use crate::storage::Storage;

use super::create_error_response;

#[derive(Clone)]
pub struct RequirePermission {
    permission: Permission,
}

impl RequirePermission {
    pub fn new(permission: Permission) -> Self {
        Self { permission }
    }

    /// 读取中间件解析好的权限集合
    pub fn extract_permissions(req: &actix_web::HttpRequest) -> Option<PermissionSet> {
        req.extensions().get::<PermissionSet>().cloned()
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequirePermission
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequirePermissionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequirePermissionMiddleware {
            service: Rc::new(service),
            permission: self.permission,
        }))
    }
}

pub struct RequirePermissionMiddleware<S> {
    service: Rc<S>,
    permission: Permission,
}

impl<S, B> Service<ServiceRequest> for RequirePermissionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let permission = self.permission;

        Box::pin(async move {
            let Some(user) = req.extensions().get::<User>().cloned() else {
                info!(
                    "Permission check failed: no user found in request. Make sure RequireJWT middleware is applied first."
                );
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            let storage = req
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .map(|s| s.get_ref().clone());
            let cache = req
                .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
                .map(|c| c.get_ref().clone());
            let (Some(storage), Some(cache)) = (storage, cache) else {
                error!("Storage or cache missing from app data");
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorCode::InternalServerError,
                        "Server misconfigured",
                    )
                    .map_into_right_body(),
                ));
            };

            let permissions = match load_permission_set(&storage, &cache, &user).await {
                Ok(permissions) => permissions,
                Err(e) => {
                    error!("Failed to resolve permissions for user {}: {}", user.id, e);
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorCode::InternalServerError,
                            "Failed to resolve permissions",
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            if !permissions.has_any_scope(permission) {
                info!(
                    "Permission {} denied for user {} ({})",
                    permission, user.id, user.username
                );
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::FORBIDDEN,
                        ErrorCode::Forbidden,
                        &format!("Missing permission: {permission}"),
                    )
                    .map_into_right_body(),
                ));
            }

            req.extensions_mut().insert(permissions);
            let res = srv.call(req).await?.map_into_left_body();
            Ok(res)
        })
    }
}
