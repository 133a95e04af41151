use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::{AttainmentService, load_graph};
use crate::config::AppConfig;
use crate::models::ApiResponse;
use crate::models::access::entities::Permission;
use crate::models::attainment::entities::AttainmentSummary;

/// 方案达成度汇总：CLO / PI / PLO 三层与映射覆盖度
pub async fn framework_summary(
    service: &AttainmentService,
    framework_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let framework = crate::services::load_framework(&storage, framework_id).await?;
    crate::services::ensure_framework_permission(request, Permission::ReportView, &framework)
        .await?;

    let threshold = AppConfig::get().assessment.attainment_threshold;
    let graph = load_graph(&storage, framework.id).await?;
    let results = storage.list_latest_clo_results(framework.id).await?;
    debug!(
        "Summarizing attainment for framework {} from {} CLO results",
        framework.code,
        results.len()
    );

    let (clos, pis, plos) = graph.summarize(&results, threshold);
    let summary = AttainmentSummary {
        framework_id: framework.id,
        attainment_threshold: threshold,
        student_count: storage.count_students(framework.id).await?,
        clos,
        pis,
        plos,
        coverage: graph.coverage(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        summary,
        "Attainment summary retrieved successfully",
    )))
}
