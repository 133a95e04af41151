use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FrameworkService;
use crate::models::ApiResponse;
use crate::models::access::entities::Permission;
use crate::models::frameworks::entities::{FrameworkMappings, LinkKind, OutcomeKind};

/// 一次返回方案下的课程、全部成果与三类映射
pub async fn get_mappings(
    service: &FrameworkService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (storage, framework) = service
        .authorize(request, id, Permission::FrameworkView)
        .await?;

    let mappings = FrameworkMappings {
        courses: storage.list_courses(id).await?,
        plos: storage.list_outcomes(OutcomeKind::Plo, id).await?,
        pis: storage.list_outcomes(OutcomeKind::Pi, id).await?,
        clos: storage.list_outcomes(OutcomeKind::Clo, id).await?,
        plo_pi_links: storage.list_links(LinkKind::PloPi, id).await?,
        plo_clo_links: storage.list_links(LinkKind::PloClo, id).await?,
        pi_clo_links: storage.list_links(LinkKind::PiClo, id).await?,
        framework,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        mappings,
        "Mappings retrieved successfully",
    )))
}
