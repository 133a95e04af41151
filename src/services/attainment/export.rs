use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::rollup::{OutcomeGraph, StudentScores};
use super::{AttainmentService, load_graph};
use crate::errors::Result;
use crate::models::access::entities::Permission;
use crate::models::attainment::entities::LatestCloResult;
use crate::models::attainment::requests::AttainmentExportQuery;
use crate::models::frameworks::entities::{Outcome, OutcomeKind};
use crate::models::students::entities::Student;
use crate::models::students::requests::StudentListQuery;
use crate::services::{csv_attachment, write_csv};
use crate::storage::Storage;

const EXPORT_PAGE_SIZE: i64 = 100;

async fn all_students(storage: &Arc<dyn Storage>, framework_id: i64) -> Result<Vec<Student>> {
    let mut students = Vec::new();
    let mut page = 1;
    loop {
        let response = storage
            .list_students_with_pagination(StudentListQuery {
                page: Some(page),
                size: Some(EXPORT_PAGE_SIZE),
                framework_id: Some(framework_id),
                search: None,
            })
            .await?;
        students.extend(response.items);
        if page >= response.pagination.total_pages {
            break;
        }
        page += 1;
    }
    Ok(students)
}

/// 学生 × 成果矩阵，单元格为得分百分比，未评价留空
fn matrix_rows(
    graph: &OutcomeGraph,
    level: OutcomeKind,
    students: &[Student],
    results: &[LatestCloResult],
) -> (Vec<String>, Vec<Vec<String>>) {
    let outcomes: &[Outcome] = match level {
        OutcomeKind::Plo => &graph.plos,
        OutcomeKind::Pi => &graph.pis,
        OutcomeKind::Clo => &graph.clos,
    };

    let mut header = vec!["student_code".to_string(), "full_name".to_string()];
    header.extend(outcomes.iter().map(|o| o.code.clone()));

    let mut by_student: BTreeMap<i64, Vec<&LatestCloResult>> = BTreeMap::new();
    for result in results {
        by_student.entry(result.student_id).or_default().push(result);
    }

    let rows = students
        .iter()
        .map(|student| {
            let scores = by_student
                .get(&student.id)
                .map(|r| graph.student_scores(r))
                .unwrap_or_default();
            let mut row = vec![student.student_code.clone(), student.full_name.clone()];
            row.extend(outcomes.iter().map(|o| cell(&scores, level, o.id)));
            row
        })
        .collect();

    (header, rows)
}

fn cell(scores: &StudentScores, level: OutcomeKind, id: i64) -> String {
    let value = match level {
        OutcomeKind::Clo => scores.clos.get(&id).map(|(p, _)| *p),
        OutcomeKind::Pi => scores.pis.get(&id).copied(),
        OutcomeKind::Plo => scores.plos.get(&id).copied(),
    };
    value.map(|p| format!("{p:.2}")).unwrap_or_default()
}

pub async fn export_attainment(
    service: &AttainmentService,
    framework_id: i64,
    query: AttainmentExportQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let framework = crate::services::load_framework(&storage, framework_id).await?;
    crate::services::ensure_framework_permission(request, Permission::ReportView, &framework)
        .await?;

    let graph = load_graph(&storage, framework.id).await?;
    let students = all_students(&storage, framework.id).await?;
    let results = storage.list_latest_clo_results(framework.id).await?;

    let (header, rows) = matrix_rows(&graph, query.level, &students, &results);
    let header: Vec<&str> = header.iter().map(String::as_str).collect();
    let data = write_csv(&header, rows)?;

    Ok(csv_attachment(
        &format!(
            "{}_{}_attainment.csv",
            framework.code,
            query.level.label().to_lowercase()
        ),
        data,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::observations::entities::CloResultStatus;
    use crate::models::users::entities::UserStatus;
    use chrono::Utc;

    fn clo(id: i64) -> Outcome {
        Outcome {
            id,
            kind: OutcomeKind::Clo,
            framework_id: 1,
            course_id: Some(1),
            code: format!("CLO{id}"),
            description: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn student(id: i64) -> Student {
        Student {
            id,
            user_id: id,
            framework_id: 1,
            student_code: format!("S{id}"),
            full_name: format!("Student {id}"),
            username: format!("s{id}"),
            email: format!("s{id}@example.com"),
            status: UserStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn unevaluated_cells_stay_blank() {
        let graph = OutcomeGraph {
            clos: vec![clo(1), clo(2)],
            ..Default::default()
        };
        let results = vec![LatestCloResult {
            student_id: 1,
            clo_id: 2,
            score_percent: 72.5,
            status: CloResultStatus::Achieved,
            recorded_at: Utc::now(),
        }];

        let (header, rows) =
            matrix_rows(&graph, OutcomeKind::Clo, &[student(1), student(2)], &results);
        assert_eq!(header, vec!["student_code", "full_name", "CLO1", "CLO2"]);
        assert_eq!(rows[0], vec!["S1", "Student 1", "", "72.50"]);
        assert_eq!(rows[1][2..], ["".to_string(), "".to_string()]);
    }
}
