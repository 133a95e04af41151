pub mod export;
pub mod rollup;
pub mod student;
pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::attainment::entities::StudentAttainment;
use crate::models::attainment::requests::AttainmentExportQuery;
use crate::models::frameworks::entities::{LinkKind, OutcomeKind};
use crate::models::students::entities::Student;
use crate::storage::Storage;
use rollup::OutcomeGraph;

pub struct AttainmentService {
    storage: Option<Arc<dyn Storage>>,
}

/// 载入方案的全部成果与映射
pub(crate) async fn load_graph(
    storage: &Arc<dyn Storage>,
    framework_id: i64,
) -> Result<OutcomeGraph> {
    Ok(OutcomeGraph {
        plos: storage.list_outcomes(OutcomeKind::Plo, framework_id).await?,
        pis: storage.list_outcomes(OutcomeKind::Pi, framework_id).await?,
        clos: storage.list_outcomes(OutcomeKind::Clo, framework_id).await?,
        plo_pi_links: storage.list_links(LinkKind::PloPi, framework_id).await?,
        plo_clo_links: storage.list_links(LinkKind::PloClo, framework_id).await?,
        pi_clo_links: storage.list_links(LinkKind::PiClo, framework_id).await?,
    })
}

/// 单个学生的三层达成度
pub(crate) async fn student_attainment(
    storage: &Arc<dyn Storage>,
    student: &Student,
) -> Result<StudentAttainment> {
    let threshold = AppConfig::get().assessment.attainment_threshold;
    let graph = load_graph(storage, student.framework_id).await?;
    let results: Vec<_> = storage
        .list_latest_clo_results(student.framework_id)
        .await?
        .into_iter()
        .filter(|r| r.student_id == student.id)
        .collect();

    let scores = graph.student_scores(&results.iter().collect::<Vec<_>>());
    let (clos, pis, plos) = graph.student_outcomes(&scores, threshold);

    Ok(StudentAttainment {
        student_id: student.id,
        framework_id: student.framework_id,
        attainment_threshold: threshold,
        clos,
        pis,
        plos,
    })
}

impl AttainmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn framework_summary(
        &self,
        framework_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        summary::framework_summary(self, framework_id, request).await
    }

    pub async fn student_attainment(
        &self,
        student_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        student::get_student_attainment(self, student_id, request).await
    }

    pub async fn export(
        &self,
        framework_id: i64,
        query: AttainmentExportQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        export::export_attainment(self, framework_id, query, request).await
    }
}
